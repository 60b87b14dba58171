use std::{
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use chrono::Local;
use clap::{
    Parser,
    Subcommand,
};
use farmguard::{
    chat::{
        self,
        ChatClient,
        CompletionBackend,
    },
    database::DatabaseClient,
    i18n,
    ocr::{
        self,
        extract_prescription,
        Extraction,
        TesseractCommand,
    },
    realtime::AlertFeed,
    speech::{
        prepare_for_speech,
        select_voice,
        EspeakSynthesizer,
        Speaker,
        Voice,
    },
    AppConfig,
    FarmError,
    Language,
};
use serde_json::json;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "farmguard")]
#[command(about = "Farm dashboard tools: prescription scanning, speech, chat and alerts", long_about = None)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the platform data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a prescription from recognized text or an image
    Scan {
        /// Text file with OCR output, `-` for stdin
        input: Option<String>,

        /// Prescription image the text came from
        #[arg(long)]
        image: Option<PathBuf>,

        /// Run tesseract on --image instead of reading text
        #[arg(long = "ocr", requires = "image")]
        run_ocr: bool,

        /// Tesseract language packs
        #[arg(long, value_delimiter = ',', default_value = "eng")]
        ocr_lang: Vec<String>,

        /// Store the result in the database
        #[arg(long, requires = "user")]
        save: bool,

        #[arg(long)]
        user: Option<Uuid>,
    },

    /// Print text as it would be sent to the speech synthesizer
    PrepareSpeech {
        #[arg(short, long, value_parser = parse_language)]
        lang: Option<Language>,

        text: String,
    },

    /// Pick a voice for a language from a JSON list of voices
    Voices {
        #[arg(short, long, value_parser = parse_language)]
        lang: Option<Language>,

        /// JSON array of `{name, lang}` objects
        file: PathBuf,
    },

    /// Read text aloud with espeak-ng
    Speak {
        #[arg(short, long, value_parser = parse_language)]
        lang: Option<Language>,

        /// Voice name, overriding automatic selection
        #[arg(long)]
        voice: Option<String>,

        text: String,
    },

    /// Look up a dashboard label
    Translate {
        key: String,

        #[arg(short, long, value_parser = parse_language)]
        lang: Option<Language>,
    },

    /// Ask the farm assistant through the chat proxy
    Chat {
        message: String,

        #[arg(short, long, value_parser = parse_language)]
        lang: Option<Language>,
    },

    /// Run the chat proxy
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Follow a user's alerts and the unread badge
    Alerts {
        #[arg(long)]
        user: Uuid,
    },

    /// Dashboard counts for a user
    Summary {
        #[arg(long)]
        user: Uuid,
    },

    /// Print the effective configuration
    Config,
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse().map_err(|e: FarmError| e.to_string())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref());

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), FarmError> {
    match command {
        Commands::Scan { input, image, run_ocr, ocr_lang, save, user } => {
            let extraction = if run_ocr {
                let recognizer = TesseractCommand { languages: ocr_lang, ..Default::default() };
                let image = image
                    .as_deref()
                    .ok_or_else(|| FarmError::Config("--ocr needs --image".to_string()))?;
                ocr::scan_prescription(&recognizer, image).await?
            } else {
                let text = read_input(input.as_deref()).await?;
                let mut extraction = extract_prescription(&text);
                extraction.prescription.source_image = image.map(|p| p.display().to_string());
                extraction
            };

            print_extraction(&extraction)?;

            if let (true, Some(user)) = (save, user) {
                let db = DatabaseClient::from_config(&config)?;
                let saved = db.save_prescription(&user, &extraction.prescription).await?;
                println!("saved: {}", saved.id.map(|id| id.to_string()).unwrap_or_default());
            }
            Ok(())
        }

        Commands::PrepareSpeech { lang, text } => {
            println!("{}", prepare_for_speech(&text, lang.unwrap_or(config.language)));
            Ok(())
        }

        Commands::Voices { lang, file } => {
            let language = lang.unwrap_or(config.language);
            let raw = tokio::fs::read_to_string(&file).await?;
            let voices: Vec<Voice> = serde_json::from_str(&raw)?;

            match select_voice(&voices, language) {
                Some(voice) => println!("{} ({})", voice.name, voice.lang),
                None => println!("no voice for {language}, synthesizer default will be used"),
            }
            Ok(())
        }

        Commands::Speak { lang, voice, text } => {
            let language = lang.unwrap_or(config.language);
            let mut settings = config.voice.clone();
            if voice.is_some() {
                settings.preferred_voice = voice;
            }

            let speaker = Speaker::new(Arc::new(EspeakSynthesizer::default()));
            let outcome = speaker.speak(&text, language, &settings).await?;
            tracing::debug!("Speech finished: {:?}", outcome);
            Ok(())
        }

        Commands::Translate { key, lang } => {
            match lang {
                Some(language) => println!("{}", i18n::translate(&key, language)),
                None => {
                    for language in Language::ALL {
                        println!("{:<8} {}", language.code(), i18n::translate(&key, language));
                    }
                }
            }
            Ok(())
        }

        Commands::Chat { message, lang } => {
            let client = ChatClient::new(&config.chat_endpoint)?.with_auth_token(&config.database_key);
            let reply = client.ask(&message, lang.unwrap_or(config.language)).await?;
            println!("{reply}");
            Ok(())
        }

        Commands::Serve { host, port } => {
            let backend = Arc::new(CompletionBackend::from_config(&config)?);
            let host = host.unwrap_or(config.server_host);
            let port = port.unwrap_or(config.server_port);
            chat::serve(&host, port, backend).await
        }

        Commands::Alerts { user } => {
            let db = DatabaseClient::from_config(&config)?;
            let mut feed = AlertFeed::subscribe(&db, user).await?;
            println!("{}: {}", i18n::translate("alerts.unread", config.language), feed.unread_count());

            loop {
                tokio::select! {
                    change = feed.next_change() => match change {
                        Some(change) => println!(
                            "{:?} {} | {}: {}",
                            change.kind,
                            change.title().unwrap_or(""),
                            i18n::translate("alerts.unread", config.language),
                            feed.unread_count()
                        ),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            feed.close().await
        }

        Commands::Summary { user } => {
            let db = DatabaseClient::from_config(&config)?;
            let summary = db.dashboard_summary(&user, Local::now().date_naive()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }

        Commands::Config => {
            let mut shown = config.clone();
            shown.database_key = mask(&shown.database_key);
            shown.chat_api_key = mask(&shown.chat_api_key);
            println!("{}", serde_json::to_string_pretty(&shown)?);
            println!("# file: {}", AppConfig::default_path().display());
            Ok(())
        }
    }
}

async fn read_input(input: Option<&str>) -> Result<String, FarmError> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
    }
}

fn print_extraction(extraction: &Extraction) -> Result<(), FarmError> {
    let missing: Vec<&str> = extraction.missing_fields().iter().map(|f| f.name()).collect();
    let output = json!({
        "prescription": extraction.prescription,
        "missing_fields": missing,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn mask(secret: &str) -> String {
    match secret.char_indices().nth(4) {
        Some((end, _)) => format!("{}…", &secret[..end]),
        None if secret.is_empty() => String::new(),
        None => "…".to_string(),
    }
}
