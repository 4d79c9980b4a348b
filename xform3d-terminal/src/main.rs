//! xform3d Terminal Demo - interactive cube
//!
//! Usage:
//!   xform3d-terminal [settings.json]
//!   xform3d-terminal --help
//!
//! Controls:
//!   - Arrow keys: scale along X/Y
//!   - Mouse drag: rotate in place; Shift/Ctrl/Alt + drag: translate
//!   - W/S: dolly, A/D: look around
//!   - R: reset, Q/ESC: quit
//!
//! Logs go to the file named by `XFORM3D_LOG` (filtered by `RUST_LOG`),
//! since stdout belongs to the renderer.

use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use xform3d_core::Settings;
use xform3d_terminal::{Mesh, TerminalApp};

#[derive(Parser, Debug)]
#[command(name = "xform3d-terminal")]
#[command(about = "Interactive model and camera transforms on an ASCII cube", long_about = None)]
struct Cli {
    /// JSON settings file; missing fields take their defaults
    settings: Option<PathBuf>,
}

fn init_logging() -> anyhow::Result<()> {
    let Ok(path) = env::var("XFORM3D_LOG") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    info!(?settings, "Starting terminal viewer");

    println!("xform3d Terminal Renderer - Loading...");
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(Mesh::cube(1.0), settings)?;
    app.run()?;

    println!("Thank you for using xform3d!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_settings_path_is_optional() {
        let cli = Cli::try_parse_from(["xform3d-terminal"]).unwrap();
        assert!(cli.settings.is_none());
        let cli = Cli::try_parse_from(["xform3d-terminal", "viewer.json"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("viewer.json")));
        assert!(Cli::try_parse_from(["xform3d-terminal", "a.json", "b.json"]).is_err());
    }
}
