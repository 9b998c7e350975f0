use clap::Parser;

mod app;
mod args;
mod assets;
mod renderer;

use app::App;
use args::Args;
use renderer::TexturedQuadRenderer;

fn main() {
    init_logging();

    let args = <Args as Parser>::parse();

    let image = match assets::load(args.image.as_deref()) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Could not load texture image: {e}");
            std::process::exit(-1);
        }
    };

    log::info!("Loaded {}x{} texture image", image.width, image.height);

    let renderer = TexturedQuadRenderer::new(image);

    let app = match App::new(renderer, args.width, args.height) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Could not initialize: {e}");
            std::process::exit(-1);
        }
    };

    app.run();
}

fn init_logging() {
    let colors = fern::colors::ColoredLevelConfig::new();

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()
        .unwrap();
}
