//! `wdat-native`: batch front end over the editor core.
//!
//! ```text
//! wdat-native <image> [labels.txt] [--export <out.txt>] [--init-config]
//! ```
//!
//! Loads the image to learn its natural size, imports the label file if one
//! is given, prints the annotation list and writes the normalized export.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use thiserror::Error;

    use wdat::format::{AnnotationFormat, FormatError, POLYGON_TXT_FILENAME};
    use wdat::loading::{ImageError, decode_image_size};
    use wdat::render::build_scene;
    use wdat::{Editor, EditorConfig};

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("Failed to read {path:?}: {source}")]
        Io {
            path: PathBuf,
            source: std::io::Error,
        },

        #[error(transparent)]
        Image(#[from] ImageError),

        #[error(transparent)]
        Format(#[from] FormatError),

        #[error(transparent)]
        Config(#[from] wdat::config::ConfigError),
    }

    /// Parsed command line.
    #[derive(Parser, Debug, PartialEq)]
    #[command(
        name = "wdat-native",
        version,
        about = "Import weld defect polygons for an image and write the normalized export"
    )]
    pub struct Args {
        /// Image the annotations belong to
        pub image: PathBuf,
        /// Label file to import (format picked by extension)
        pub labels: Option<PathBuf>,
        /// Where to write the export
        #[arg(short = 'o', long, value_name = "OUT")]
        pub export: Option<PathBuf>,
        /// Write the default configuration file before running
        #[arg(long, default_value_t = false)]
        pub init_config: bool,
    }

    fn read(path: &Path) -> Result<Vec<u8>, CliError> {
        std::fs::read(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn run(config: &EditorConfig, args: Args) -> Result<(), CliError> {
        if args.init_config {
            config.save_to_default_path()?;
        }

        let mut editor = Editor::new(config);

        let ticket = editor.begin_image_load(args.image.display().to_string());
        let size = decode_image_size(&read(&args.image)?)?;
        editor.complete_image_load(ticket, Ok((size.width(), size.height())));
        println!(
            "Image: {} ({}x{})",
            args.image.display(),
            size.width(),
            size.height()
        );

        if let Some(labels) = &args.labels {
            let bytes = read(labels)?;
            let text = String::from_utf8_lossy(&bytes);
            let ext = labels
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();
            let format = editor.formats().by_extension(ext).first().copied();
            let format: &dyn AnnotationFormat = format.unwrap_or_else(|| editor.formats().native());
            let (format_id, format_name) = (format.id(), format.display_name());
            let ticket = editor.begin_import();
            if let Some(summary) = editor.complete_import_as(ticket, format_id, &text)? {
                println!(
                    "Imported {} annotations from {} as {} ({} warnings)",
                    summary.imported,
                    labels.display(),
                    format_name,
                    summary.warnings.len()
                );
                for warning in &summary.warnings {
                    eprintln!("  warning: {}", warning);
                }
            }
        }

        let scene = build_scene(&editor);
        println!("Annotations ({}):", scene.annotation_count());
        for row in &scene.list {
            println!(
                "  #{:<3} {:<16} {} vertices  {}",
                row.index,
                row.class_name,
                row.vertex_count,
                row.color.to_css()
            );
        }

        let file = editor.export_file()?;
        let out = args
            .export
            .unwrap_or_else(|| PathBuf::from(POLYGON_TXT_FILENAME));
        std::fs::write(&out, &file.contents).map_err(|source| CliError::Io {
            path: out.clone(),
            source,
        })?;
        log::info!("📤 Wrote {} ({} bytes)", out.display(), file.contents.len());
        println!("Exported to {}", out.display());
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Result<Args, clap::Error> {
            Args::try_parse_from(std::iter::once("wdat-native").chain(list.iter().copied()))
        }

        #[test]
        fn test_cli_definition_is_valid() {
            use clap::CommandFactory;
            Args::command().debug_assert();
        }

        #[test]
        fn test_parse_image_and_labels() {
            let parsed = args(&["weld.jpg", "labels.txt", "--export", "out.txt"]).unwrap();
            assert_eq!(parsed.image, PathBuf::from("weld.jpg"));
            assert_eq!(parsed.labels, Some(PathBuf::from("labels.txt")));
            assert_eq!(parsed.export, Some(PathBuf::from("out.txt")));
            assert!(!parsed.init_config);

            let short = args(&["weld.jpg", "-o", "out.txt", "--init-config"]).unwrap();
            assert_eq!(short.labels, None);
            assert_eq!(short.export, Some(PathBuf::from("out.txt")));
            assert!(short.init_config);
        }

        #[test]
        fn test_parse_requires_image() {
            assert!(args(&[]).is_err());
            let help = args(&["--help"]).unwrap_err();
            assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        }

        #[test]
        fn test_parse_rejects_unknown_flags_and_extras() {
            assert!(args(&["a.jpg", "--zoom"]).is_err());
            assert!(args(&["a.jpg", "b.txt", "c.txt"]).is_err());
            assert!(args(&["a.jpg", "--export"]).is_err());
        }
    }
}

/// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    let config = wdat::EditorConfig::load_or_default();
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let args = <cli::Args as clap::Parser>::parse();
    match cli::run(&config, args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
