#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use translation_client_core::config::{
    resolve_base_url, resolve_string_with_default, ClientConfig, DebounceInterval, Env, StdEnv,
    TargetCode, DEFAULT_DEBOUNCE_MS, DEFAULT_PREFERRED_TARGET, ENV_API_BASE_URL,
    ENV_PREFERRED_TARGET,
};
use translation_client_core::controller::{ControllerHandle, TranslationController};
use translation_client_core::session::{OutputPane, Session, SwapOutcome, LOADING_MESSAGE};
use translation_client_core::translate::{
    EchoTranslationApi, HttpTranslationApi, TranslationApi,
};

#[derive(Parser, Debug)]
#[command(name = "translation-client")]
#[command(about = "Type to translate; lines starting with ':' are commands (:help)")]
struct Args {
    /// Base URL of the translation backend.
    #[arg(long)]
    api_url: Option<String>,

    /// Target picked after the catalogs load, when the backend offers it.
    #[arg(long)]
    preferred_target: Option<String>,

    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Use the built-in echo backend instead of the network.
    #[arg(long, default_value_t = false)]
    offline: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

const HELP: &str = "\
:source <code>   select source language (auto = detect)
:target <code>   select target language
:swap            swap languages and texts
:clear           clear the input
:langs           list available languages
:show            print the current state
:quit            exit
anything else    becomes the text to translate";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let offline = args.offline;
    let cfg = build_config(args, &StdEnv)?;

    tracing::info!(
        base_url = %cfg.base_url.as_str(),
        preferred_target = %cfg.preferred_target.as_str(),
        debounce_ms = cfg.debounce.quiet_ms,
        offline,
        "config loaded"
    );

    if offline {
        run(Arc::new(EchoTranslationApi::new()), cfg).await
    } else {
        let api = HttpTranslationApi::new(cfg.base_url.clone())
            .context("failed to build http client")?;
        run(Arc::new(api), cfg).await
    }
}

async fn run<A>(api: Arc<A>, cfg: ClientConfig) -> anyhow::Result<()>
where
    A: TranslationApi + 'static,
{
    let (handle, task) = TranslationController::spawn(api, cfg);
    let renderer = tokio::spawn(render_changes(handle.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match handle_line(&handle, line.trim_end()).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    handle.shutdown().await;
    task.await.context("controller task panicked")?;
    renderer.abort();
    Ok(())
}

/// Returns `false` when the user asked to quit.
async fn handle_line(handle: &ControllerHandle, line: &str) -> anyhow::Result<bool> {
    let Some(command) = line.strip_prefix(':') else {
        handle.set_input(line).await?;
        return Ok(true);
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "q"), _) => return Ok(false),
        (Some("help" | "h"), _) => println!("{HELP}"),
        (Some("source"), Some(code)) => handle.set_source(code).await?,
        (Some("target"), Some(code)) => handle.set_target(code).await?,
        (Some("swap"), _) => {
            if handle.swap().await? == SwapOutcome::Disabled {
                println!("can't swap while detecting the language");
            }
        }
        (Some("clear"), _) => handle.clear_input().await?,
        (Some("langs"), _) => print_languages(&handle.snapshot().await?),
        (Some("show"), _) => print_state(&handle.snapshot().await?),
        _ => anyhow::bail!("unknown command `:{command}` (try :help)"),
    }
    Ok(true)
}

async fn render_changes(mut view: watch::Receiver<Session>) {
    let mut last = String::new();
    while view.changed().await.is_ok() {
        let line = status_line(&view.borrow_and_update());
        if line != last {
            println!("{line}");
            last = line;
        }
    }
}

fn status_line(s: &Session) -> String {
    let header = match s.detected_language_name() {
        Some(name) => format!("[{} -> {}, detected: {name}]", s.source_name(), s.target_name()),
        None => format!("[{} -> {}]", s.source_name(), s.target_name()),
    };
    match s.output_pane() {
        OutputPane::Loading => format!("{header} {LOADING_MESSAGE}"),
        OutputPane::Error(error) => format!("{header} error: {error}"),
        OutputPane::Text(text) => format!("{header} {text}"),
    }
}

fn print_languages(s: &Session) {
    let render = |entries: Vec<String>| entries.join(", ");
    println!(
        "source: {}",
        render(
            s.source_catalog
                .iter()
                .map(|e| format!("{} ({})", e.display_name, e.code))
                .collect()
        )
    );
    println!(
        "target: {}",
        render(
            s.target_catalog
                .iter()
                .map(|e| format!("{} ({})", e.display_name, e.code))
                .collect()
        )
    );
}

fn print_state(s: &Session) {
    println!("input:  {}", s.input_text);
    println!("{}", status_line(s));
    println!(
        "swap: {}  clear: {}  copy: {}",
        s.swap_enabled(),
        s.clear_enabled(),
        s.copy_enabled()
    );
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<ClientConfig> {
    let base_url = resolve_base_url(args.api_url, ENV_API_BASE_URL, env)?;
    let preferred_target = TargetCode::new(resolve_string_with_default(
        args.preferred_target,
        ENV_PREFERRED_TARGET,
        env,
        DEFAULT_PREFERRED_TARGET,
    ))?;
    let debounce = DebounceInterval::new(args.debounce_ms)?;

    Ok(ClientConfig {
        base_url,
        preferred_target,
        debounce,
        ..ClientConfig::default()
    })
}
