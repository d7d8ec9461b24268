// SPDX-License-Identifier: MPL-2.0
use async_trait::async_trait;
use bucket_roster::application::admin::{self, AdminConsole};
use bucket_roster::application::browse::{outline, BucketBrowser};
use bucket_roster::application::gallery::{
    Effect, GalleryCommand, GalleryController, GallerySettings, NoticeLevel,
};
use bucket_roster::application::port::{
    AdminApi, MetadataReader, MetadataWriter, ObjectLister, TransportError, UploadFile,
};
use bucket_roster::config::{self, Config, ARCHIVE_EXTENSION};
use bucket_roster::domain::gallery::{GalleryState, ItemMetadata};
use bucket_roster::error::{Error, Result};
use bucket_roster::infrastructure::{BackendClient, MemoryStore, S3HttpStore};
use bucket_roster::logging;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

const HELP: &str = "\
bucket-roster: browse a bucket and manage its image roster

USAGE:
  bucket-roster [--config PATH] [--verbose] [--demo] <COMMAND> [ARGS]

COMMANDS:
  tree [--prefix P] [--sorted]        Show the bucket as a folder tree
  gallery                             List roster images in display order
  reorder FROM TO                     Move image FROM to TO (0-based) and save
  swap I J                            Exchange images I and J and save
  caption KEY TEXT                    Set the caption of one image
  slideshow [--ticks N]               Autoplay through the roster
  upload FOLDER FILE [--prefix P] [--field K=V]...
                                      Upload a .zip archive or a single file
  delete-folder NAME --yes            Delete a folder and everything in it
  delete-files PATH... --yes          Delete individual files
  metadata KEY K=V...                 Merge metadata into one object

FLAGS:
  --config PATH   Settings file (default: platform config dir)
  --demo          Use a built-in sample bucket instead of the network
  -v, --verbose   Debug logging (RUST_LOG overrides)
  -h, --help      Print this help
";

/// Where every port is served from.
struct Backend {
    lister: Arc<dyn ObjectLister>,
    reader: Arc<dyn MetadataReader>,
    writer: Option<Arc<dyn MetadataWriter>>,
    admin: Option<Arc<dyn AdminApi>>,
}

impl Backend {
    fn connect(config: &Config, demo: bool) -> Result<Self> {
        if demo {
            let store = Arc::new(MemoryStore::demo(config.storage.public_url.clone()));
            return Ok(Self {
                lister: store.clone(),
                reader: store.clone(),
                writer: Some(store.clone()),
                admin: Some(store),
            });
        }

        let store = Arc::new(S3HttpStore::from_config(&config.storage)?);
        let backend = match BackendClient::from_config(config) {
            Ok(client) => Some(Arc::new(client)),
            Err(err) => {
                debug!("admin backend unavailable: {err}");
                None
            }
        };
        Ok(Self {
            lister: store.clone(),
            reader: store,
            writer: backend
                .clone()
                .map(|client| client as Arc<dyn MetadataWriter>),
            admin: backend.map(|client| client as Arc<dyn AdminApi>),
        })
    }

    fn admin(&self, config: &Config) -> Result<AdminConsole> {
        match &self.admin {
            Some(api) => Ok(AdminConsole::new(api.clone())),
            // Surfaces the precise reason (missing endpoint or token).
            None => BackendClient::from_config(config)
                .map(|client| AdminConsole::new(Arc::new(client))),
        }
    }

    /// Gallery controller; read-only unless an admin backend is configured.
    fn gallery(&self, config: &Config) -> GalleryController {
        let writer = self
            .writer
            .clone()
            .unwrap_or_else(|| Arc::new(ReadOnly) as Arc<dyn MetadataWriter>);
        GalleryController::new(
            GallerySettings::from(config),
            self.lister.clone(),
            self.reader.clone(),
            writer,
        )
    }

    fn require_writer(&self, config: &Config) -> Result<()> {
        match &self.writer {
            Some(_) => Ok(()),
            None => BackendClient::from_config(config).map(|_| ()),
        }
    }
}

/// Writer used without an admin backend; every write is refused.
struct ReadOnly;

#[async_trait]
impl MetadataWriter for ReadOnly {
    async fn write_metadata(
        &self,
        _key: &str,
        _metadata: &ItemMetadata,
    ) -> std::result::Result<(), TransportError> {
        Err(TransportError::Http {
            status: 403,
            message: "Admin privileges required.".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }
    let verbose = args.contains(["-v", "--verbose"]);
    logging::init(verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(mut args: pico_args::Arguments) -> Result<()> {
    let demo = args.contains("--demo");
    let config_path: Option<PathBuf> = args.opt_value_from_str("--config").map_err(cli_error)?;
    let config = load_config(config_path.as_deref())?;
    let backend = Backend::connect(&config, demo)?;

    let Some(command) = args.subcommand().map_err(cli_error)? else {
        print!("{HELP}");
        return Ok(());
    };
    debug!(%command, demo, "running command");

    match command.as_str() {
        "tree" => {
            let prefix: String = args
                .opt_value_from_str("--prefix")
                .map_err(cli_error)?
                .unwrap_or_default();
            let sorted = args.contains("--sorted");
            finish(args)?;

            let browser = BucketBrowser::new(backend.lister.clone(), &config.storage);
            let tree = browser.browse(&prefix).await?;
            let tree = if sorted { tree.sorted() } else { tree };
            print!("{}", outline(&tree));
            println!("{} file(s)", tree.leaf_count());
        }
        "gallery" => {
            finish(args)?;
            let mut gallery = backend.gallery(&config);
            gallery.load_gallery().await?;
            print_gallery(gallery.state());
        }
        "reorder" | "swap" => {
            let first: usize = args.free_from_str().map_err(cli_error)?;
            let second: usize = args.free_from_str().map_err(cli_error)?;
            finish(args)?;
            backend.require_writer(&config)?;

            let mut gallery = backend.gallery(&config);
            gallery.load_gallery().await?;
            let command = if command == "reorder" {
                GalleryCommand::Reorder {
                    from: first,
                    to: second,
                }
            } else {
                GalleryCommand::Swap {
                    a: first,
                    b: second,
                }
            };
            match gallery.dispatch(command).await {
                Effect::None => println!("Order unchanged."),
                effect => present(effect)?,
            }
            if gallery.state().has_unsaved_changes() {
                present(gallery.dispatch(GalleryCommand::Save).await)?;
            }
            print_gallery(gallery.state());
        }
        "caption" => {
            let key: String = args.free_from_str().map_err(cli_error)?;
            let text: String = args.free_from_str().map_err(cli_error)?;
            finish(args)?;
            backend.require_writer(&config)?;

            let mut gallery = backend.gallery(&config);
            gallery.load_gallery().await?;
            present(
                gallery
                    .dispatch(GalleryCommand::EditCaption { key, caption: text })
                    .await,
            )?;
        }
        "slideshow" => {
            let ticks: Option<usize> = args.opt_value_from_str("--ticks").map_err(cli_error)?;
            finish(args)?;
            slideshow(backend.gallery(&config), ticks).await?;
        }
        "upload" => {
            let prefix: Option<String> = args.opt_value_from_str("--prefix").map_err(cli_error)?;
            let fields: Vec<String> = args.values_from_str("--field").map_err(cli_error)?;
            let folder: String = args.free_from_str().map_err(cli_error)?;
            let path: PathBuf = args.free_from_str().map_err(cli_error)?;
            finish(args)?;

            let console = backend.admin(&config)?;
            let file = read_upload(&path)?;
            if file.name.to_lowercase().ends_with(ARCHIVE_EXTENSION) {
                console.upload_archive(&folder, file).await?;
                println!("File uploaded successfully! Processing will begin automatically.");
            } else {
                let extra = parse_fields(&fields)?;
                console
                    .upload_file(prefix.as_deref(), &folder, file, extra)
                    .await?;
                println!("File uploaded successfully!");
            }
        }
        "delete-folder" => {
            let confirmed = args.contains("--yes");
            let name: String = args.free_from_str().map_err(cli_error)?;
            finish(args)?;
            let console = backend.admin(&config)?;
            if !confirmed {
                return Err(Error::validation(format!(
                    "Deleting the entire folder \"{name}\" cannot be undone; re-run with --yes."
                )));
            }
            let report = console.delete_folder(&name).await?;
            println!("{}", admin::folder_summary(name.trim(), &report));
        }
        "delete-files" => {
            let confirmed = args.contains("--yes");
            let paths = free_strings(args)?;
            let console = backend.admin(&config)?;
            let list = paths.join("\n");
            if !confirmed {
                let count = admin::parse_file_list(&list).len();
                return Err(Error::validation(format!(
                    "Deleting {count} file(s) cannot be undone; re-run with --yes."
                )));
            }
            let report = console.delete_files(&list).await?;
            println!("{}", admin::files_summary(&report));
        }
        "metadata" => {
            let key: String = args.free_from_str().map_err(cli_error)?;
            let fields = free_strings(args)?;
            let metadata = parse_fields(&fields)?;
            let console = backend.admin(&config)?;
            console
                .update_metadata(&config.storage.bucket, &key, &metadata)
                .await?;
            println!("Successfully updated metadata for {key}");
        }
        other => {
            return Err(Error::validation(format!(
                "unknown command '{other}', see --help"
            )));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    config.api.apply_env_overrides();
    Ok(config)
}

async fn slideshow(mut gallery: GalleryController, ticks: Option<usize>) -> Result<()> {
    gallery.load_gallery().await?;
    if gallery.state().is_empty() {
        println!("No images found.");
        return Ok(());
    }

    let ticks = ticks.unwrap_or(gallery.state().len());
    print_current(gallery.state());
    gallery.start_autoplay();
    for _ in 0..ticks {
        if !gallery.next_tick().await {
            break;
        }
        print_current(gallery.state());
    }
    gallery.stop_autoplay();
    Ok(())
}

/// Prints a notice; error notices become the command's error.
fn present(effect: Effect) -> Result<()> {
    match effect {
        Effect::Notify(notice) if notice.level == NoticeLevel::Error => {
            Err(Error::validation(notice.text))
        }
        Effect::Notify(notice) => {
            println!("{}", notice.text);
            Ok(())
        }
        Effect::None | Effect::Render => Ok(()),
    }
}

fn print_gallery(state: &GalleryState) {
    if state.is_empty() {
        println!("No images found.");
        return;
    }
    for (index, item) in state.items().iter().enumerate() {
        let marker = if index == state.current_index() { '>' } else { ' ' };
        let position = if item.position.is_unset() {
            "-".to_string()
        } else {
            item.position.to_string()
        };
        println!(
            "{marker} {index:>3}  {position:>6}  {:<40}  {}",
            item.key, item.caption
        );
    }
    if state.has_unsaved_changes() {
        println!("(unsaved changes)");
    }
}

fn print_current(state: &GalleryState) {
    if let Some(item) = state.current_item() {
        let caption = if item.caption.is_empty() {
            item.key.as_str()
        } else {
            item.caption.as_str()
        };
        println!(
            "[{}/{}] {}  {}",
            state.current_index() + 1,
            state.len(),
            caption,
            item.url
        );
    }
}

fn read_upload(path: &Path) -> Result<UploadFile> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::validation(format!("not a file: {}", path.display())))?;
    let bytes = std::fs::read(path)?;
    Ok(UploadFile::new(name, bytes))
}

fn parse_fields(fields: &[String]) -> Result<BTreeMap<String, String>> {
    fields
        .iter()
        .map(|field| {
            field
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .ok_or_else(|| Error::validation(format!("expected KEY=VALUE, got '{field}'")))
        })
        .collect()
}

fn free_strings(args: pico_args::Arguments) -> Result<Vec<String>> {
    args.finish()
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| Error::validation(format!("invalid argument: {arg:?}")))
        })
        .collect()
}

fn finish(args: pico_args::Arguments) -> Result<()> {
    let rest = args.finish();
    if rest.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!("unexpected arguments: {rest:?}")))
    }
}

fn cli_error(err: pico_args::Error) -> Error {
    Error::validation(err.to_string())
}
