use clap::Parser;
use std::path::PathBuf;

/// Renders a textured quad in a window, from a bundled image or a PNG file.
#[derive(Debug, Parser)]
pub struct Args {
    /// PNG to use as the quad texture instead of the bundled image
    #[arg()]
    pub image: Option<PathBuf>,
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}
