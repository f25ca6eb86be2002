//! `aura` — terminal client for the Aura Hub partnership API.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;

use aurahub::app::upload::Draft;
use aurahub::app::{MSG_CONNECTION_FAILED, MSG_NO_RESULTS, MSG_SEMANTIC_FALLBACK, PAGE_SIZE};
use aurahub::encoding::repair_mojibake;
use aurahub::format::{format_score_badge, truncate_chars, OBJECT_EXCERPT_CHARS};
use aurahub::models::SearchResults;
use aurahub::{tui, ApiClient, Settings};

#[derive(Parser)]
#[command(name = "aura", version, about = "Busca e cadastro de parcerias do HUB Aura")]
struct Cli {
    /// Base URL of the Aura Hub API.
    #[arg(long, env = "AURA_API_URL", global = true)]
    base_url: Option<String>,

    /// Re-run zero-hit keyword searches as semantic searches.
    #[arg(long, global = true)]
    semantic_fallback: bool,

    /// Verbose logging (RUST_LOG overrides).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal client (the default).
    Tui,
    /// One-shot search, printed to stdout.
    Search {
        termo: String,
        /// Rank by semantic similarity instead of keywords.
        #[arg(long)]
        semantic: bool,
        /// 1-based result page.
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Show one record by id.
    Show { id: i64 },
    /// Run AI extraction on a PDF and optionally save the suggestions.
    Upload {
        file: PathBuf,
        /// Save the suggestions unedited as a new record.
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.debug { "aurahub=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::from_env().with_semantic_fallback(cli.semantic_fallback);
    if let Some(base_url) = &cli.base_url {
        settings = settings.with_base_url(base_url);
    }

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => tui::run(settings).await,
        Command::Search {
            termo,
            semantic,
            page,
        } => run_search(settings, &termo, semantic, page).await,
        Command::Show { id } => run_show(settings, id).await,
        Command::Upload { file, save } => run_upload(settings, &file, save).await,
    }
}

async fn run_search(
    settings: Settings,
    termo: &str,
    semantic: bool,
    page: u64,
) -> anyhow::Result<()> {
    anyhow::ensure!(!termo.trim().is_empty(), "Digite um termo para iniciar a busca.");
    anyhow::ensure!(page >= 1, "page must be >= 1");

    let client = ApiClient::new(&settings);
    let skip = (page - 1) * PAGE_SIZE;

    let mut results = search(&client, termo, semantic, skip).await?;
    if !semantic && results.total_items == 0 && settings.semantic_fallback {
        results = search(&client, termo, true, skip).await?;
        if results.total_items > 0 {
            println!("{}", style(MSG_SEMANTIC_FALLBACK).dim());
        }
    }

    if results.total_items == 0 {
        println!("{}", MSG_NO_RESULTS);
        return Ok(());
    }

    for item in &results.items {
        let organization = item
            .organization
            .as_deref()
            .map(repair_mojibake)
            .unwrap_or_else(|| "Razão Social não informada".to_string());
        let mut header = format!("#{:<6} {}", item.id, style(organization).bold());
        if let Some(score) = item.similarity_score {
            header.push_str(&format!("  {}", style(format_score_badge(score)).green()));
        }
        println!("{}", header);

        let year = item
            .term_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let object = item
            .object_description
            .as_deref()
            .map(|s| truncate_chars(&repair_mojibake(s), OBJECT_EXCERPT_CHARS))
            .unwrap_or_else(|| "Objeto não informado.".to_string());
        println!("        Ano: {} — {}", year, object);
    }

    let total_pages = results.total_items.div_ceil(PAGE_SIZE);
    if total_pages > 1 {
        println!(
            "{}",
            style(format!(
                "Página {} de {} ({} itens)",
                page, total_pages, results.total_items
            ))
            .dim()
        );
    }
    Ok(())
}

async fn search(
    client: &ApiClient,
    termo: &str,
    semantic: bool,
    skip: u64,
) -> anyhow::Result<SearchResults> {
    let result = if semantic {
        client.search_semantic(termo, skip, PAGE_SIZE).await
    } else {
        client.search_keyword(termo, skip, PAGE_SIZE).await
    };
    result.context(MSG_CONNECTION_FAILED)
}

async fn run_show(settings: Settings, id: i64) -> anyhow::Result<()> {
    use aurahub::format::{format_date, format_score_detail, NOT_INFORMED};

    let client = ApiClient::new(&settings);
    let detail = client
        .get_detail(id)
        .await
        .context("Não foi possível carregar os detalhes.")?;

    let text = |value: Option<&str>| {
        value
            .map(repair_mojibake)
            .unwrap_or_else(|| NOT_INFORMED.to_string())
    };

    println!("{}", style(text(detail.organization.as_deref())).bold());
    println!(
        "Termo Nº: {}{}",
        detail.term_number.as_deref().unwrap_or("N/A"),
        detail
            .term_year
            .map(|y| format!("/{}", y))
            .unwrap_or_default()
    );
    println!();
    println!("{}", style("Objeto do Acordo").cyan());
    println!("{}", text(detail.object_description.as_deref()));
    if let Some(plan) = detail.work_plan.as_deref() {
        println!();
        println!("{}", style("Plano de Trabalho").cyan());
        println!("{}", repair_mojibake(plan));
    }
    if let Some(score) = detail.similarity_score {
        println!();
        println!("Score de Similaridade: {}", format_score_detail(score));
    }
    println!();
    println!("{}", style("Detalhes Administrativos").cyan());
    println!("CPF/CNPJ: {}", text(detail.tax_id.as_deref()));
    println!("Situação: {}", text(detail.status.as_deref()));
    println!("Data de Assinatura: {}", format_date(detail.signature_date));
    println!("Data de Publicação: {}", format_date(detail.publication_date));
    println!("Vigência: {}", format_date(detail.validity_date));
    Ok(())
}

async fn run_upload(settings: Settings, file: &PathBuf, save: bool) -> anyhow::Result<()> {
    let client = ApiClient::new(&settings);

    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "documento.pdf".to_string());

    let suggestions = client
        .process_document(&file_name, content)
        .await
        .context("Falha ao processar o documento.")?;

    println!("{}", style("Dados extraídos").bold());
    println!("Razão Social: {}", suggestions.organization.as_deref().unwrap_or("-"));
    println!("CNPJ:         {}", suggestions.tax_id.as_deref().unwrap_or("-"));
    println!("Ano do Termo: {}", suggestions.term_year.as_deref().unwrap_or("-"));
    println!("Objeto:       {}", suggestions.object_description.as_deref().unwrap_or("-"));

    if !save {
        println!();
        println!("{}", style("Use --save para cadastrar a parceria com estes dados.").dim());
        return Ok(());
    }

    let draft = Draft {
        organization: suggestions.organization.unwrap_or_default(),
        object_description: suggestions.object_description.unwrap_or_default(),
        work_plan: String::new(),
        tax_id: suggestions.tax_id.unwrap_or_default(),
        term_year: suggestions.term_year.unwrap_or_default(),
    };
    let created = client
        .create_parceria(&draft.to_payload())
        .await
        .context("Falha ao salvar a parceria.")?;
    println!();
    println!("Parceria salva com sucesso! (id {})", created.id);
    Ok(())
}
