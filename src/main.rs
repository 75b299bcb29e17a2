use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    ledger::PurchaseLedger,
    models::store::Store,
    services::{
        drafts::{CreateDraftParameters, create_draft, read_geo_json},
        images::{SelectImageParameters, select_image},
        purchases::{
            ConfirmPurchaseParameters, RemoveImageParameters, clear_purchases, confirm_purchase,
            find_purchase, remove_image,
        },
    },
    storage::file::FileStorage,
};

mod config;
mod geometry;
mod ledger;
mod models;
mod pricing;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "worldlots",
    about = "Price and purchase polygons on the world map, stored locally"
)]
struct Cli {
    /// Directory holding the purchase store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a GeoJSON polygon without buying it
    Quote {
        /// GeoJSON file holding a polygon feature or geometry
        geojson: PathBuf,
    },

    /// Buy a GeoJSON polygon
    Buy {
        /// GeoJSON file holding a polygon feature or geometry
        geojson: PathBuf,

        /// Name or nickname for the area
        #[arg(short, long)]
        name: String,

        /// Free text description
        #[arg(short, long)]
        description: Option<String>,

        /// JPG/PNG/WEBP image, max 5 MB. Requires --consent.
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Consent to storing the image locally
        #[arg(long)]
        consent: bool,
    },

    /// List purchased areas
    List,

    /// Show a purchased area
    Show {
        /// Purchase id or part of its name
        id_or_name: String,

        /// Write the stored image to this path
        #[arg(long)]
        export_image: Option<PathBuf>,
    },

    /// Remove the image from a purchased area
    RemoveImage {
        /// Purchase id or part of its name
        id_or_name: String,
    },

    /// Forget every purchased area
    Clear,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    ui::render_error(&message.to_string());
    std::process::exit(1);
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let config = Config::resolve(cli.data_dir);
    let ledger = PurchaseLedger::new(FileStorage::new(config.data_dir));

    let mut store = Store::new(ledger.load());

    match cli.command {
        Some(Commands::Quote { geojson }) => {
            let draft = read_geo_json(&geojson)
                .and_then(|geo_json| create_draft(&store, CreateDraftParameters { geo_json }))
                .unwrap_or_else(|e| fail(e));
            ui::render_draft(&draft);
        }
        Some(Commands::Buy {
            geojson,
            name,
            description,
            image,
            consent,
        }) => {
            let draft = read_geo_json(&geojson)
                .and_then(|geo_json| create_draft(&store, CreateDraftParameters { geo_json }))
                .unwrap_or_else(|e| fail(e));

            let image = image.map(|path| {
                let image = select_image(SelectImageParameters { path, consent })
                    .unwrap_or_else(|e| fail(e));
                ui::render_info(&format!(
                    "Image ready: {} ({}, {} bytes). It stays on this device.",
                    image.file_name, image.mime_type, image.size_bytes
                ));
                image
            });

            ui::render_draft(&draft);

            let area = confirm_purchase(
                &mut store,
                &ledger,
                ConfirmPurchaseParameters {
                    draft,
                    name,
                    description,
                    image,
                    consent,
                },
            )
            .unwrap_or_else(|e| fail(e));

            ui::render_success("Purchase confirmed locally. Polygon locked and saved.");
            ui::render_info(&format!("Id: {}", area.id));
        }
        Some(Commands::List) | None => {
            ui::render_purchase_list(&store);
        }
        Some(Commands::Show {
            id_or_name,
            export_image,
        }) => {
            let area = find_purchase(&store, &id_or_name).unwrap_or_else(|e| fail(e));
            ui::render_purchase_details(area);

            if let Some(path) = export_image {
                let Some(handle) = &area.image_handle else {
                    fail(format!("'{}' has no image to export", area.name));
                };
                std::fs::write(&path, handle.bytes()).unwrap_or_else(|e| {
                    fail(format!("Failed to write '{}': {}", path.display(), e))
                });
                ui::render_success(&format!("Image written to {}", path.display()));
            }
        }
        Some(Commands::RemoveImage { id_or_name }) => {
            let (id, name) = find_purchase(&store, &id_or_name)
                .map(|area| (area.id.clone(), area.name.clone()))
                .unwrap_or_else(|e| fail(e));

            let removed = remove_image(&mut store, &ledger, RemoveImageParameters { id })
                .unwrap_or_else(|e| fail(e));

            if removed {
                ui::render_success(&format!("Image removed from '{}'", name));
            } else {
                ui::render_info(&format!("'{}' has no image", name));
            }
        }
        Some(Commands::Clear) => {
            let count = clear_purchases(&mut store, &ledger);
            ui::render_success(&format!("Cleared {} purchased areas", count));
        }
    }
}
