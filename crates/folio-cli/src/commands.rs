use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use folio_locale::InMemoryLocaleRegistry;
use folio_pages::{PageService, StoreTemplateSource};
use folio_store::{JsonFileObjectStore, ObjectStore};
use folio_types::{ContentDocument, PageKey, PageView};
use serde::Serialize;
use serde_json::json;

use crate::cli::*;
use crate::config::FolioConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = FolioConfig::load(&cli.config)?;
    let store: Arc<dyn ObjectStore> = Arc::new(
        JsonFileObjectStore::open(&config.store_path)
            .with_context(|| format!("opening store {}", config.store_path.display()))?,
    );

    if let Command::Init(args) = &cli.command {
        return cmd_init(store.as_ref(), &config, args).await;
    }

    let registry = Arc::new(InMemoryLocaleRegistry::from_config(config.locales.clone())?);
    if let Some(locale) = &cli.current_locale {
        registry.set_current_locale(locale)?;
    }
    let templates = Arc::new(StoreTemplateSource::new(store.clone()));
    let service = PageService::from_registry(store, templates, registry, config.pages.clone()).await?;
    let format = cli.format;

    match cli.command {
        Command::Init(_) => Ok(()),
        Command::Create(args) => cmd_create(&service, args, format).await,
        Command::Get(args) => cmd_get(&service, args, format).await,
        Command::Search(args) => cmd_search(&service, args, format).await,
        Command::Content(args) => cmd_content(&service, args).await,
        Command::SetContent(args) => cmd_set_content(&service, args).await,
        Command::Delete(args) => cmd_delete(&service, args).await,
        Command::Purge(args) => cmd_purge(&service, args).await,
        Command::Locales(args) => cmd_locales(&service, args, format).await,
    }
}

async fn cmd_init(store: &dyn ObjectStore, config: &FolioConfig, args: &InitArgs) -> anyhow::Result<()> {
    let key = &config.pages.template_key;
    if !args.force && store.exists(key).await? {
        println!("Template {} already present", key.bold());
        return Ok(());
    }
    store
        .put(
            key,
            json!({ "title": "New page", "content": ContentDocument::empty() }),
        )
        .await?;
    println!("{} Wrote template {}", "✓".green().bold(), key.bold());
    println!("  Store: {}", config.store_path.display());
    Ok(())
}

async fn cmd_create(service: &PageService, args: CreateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let view = service
        .create_page(&args.permalink, &args.title, &args.description, &args.keywords)
        .await?;
    if format == OutputFormat::Text {
        print!("{} ", "✓ Created".green().bold());
    }
    println!("{}", render_view(&view, format)?);
    Ok(())
}

async fn cmd_get(service: &PageService, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let locale = args.locale.as_deref();
    let view = match (&args.key, &args.permalink) {
        (Some(key), _) => service.get_page_by_key(&PageKey::new(key.as_str()), locale).await?,
        (None, Some(permalink)) => match service.get_page_by_permalink(permalink, locale).await? {
            Some(view) => view,
            None => bail!("no page with permalink {permalink}"),
        },
        (None, None) => bail!("either --key or --permalink is required"),
    };
    println!("{}", render_view(&view, format)?);
    Ok(())
}

async fn cmd_search(service: &PageService, args: SearchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let views = service
        .search(args.pattern.as_deref(), args.locale.as_deref())
        .await?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&views)?),
        OutputFormat::Text if views.is_empty() => println!("No pages."),
        OutputFormat::Text => {
            for view in &views {
                println!(
                    "{}  {}  {}",
                    view.key.as_str().yellow(),
                    view.permalink.cyan(),
                    view.title.bold()
                );
            }
        }
    }
    Ok(())
}

async fn cmd_content(service: &PageService, args: ContentArgs) -> anyhow::Result<()> {
    let content = service
        .get_page_content(&PageKey::new(args.key), args.locale.as_deref())
        .await?;
    println!("{}", to_json(&content)?);
    Ok(())
}

async fn cmd_set_content(service: &PageService, args: SetContentArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let content: ContentDocument = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    service
        .update_page_content(&PageKey::new(args.key.as_str()), content, args.locale.as_deref())
        .await?;
    println!("{} Content of {} updated", "✓".green().bold(), args.key.yellow());
    Ok(())
}

async fn cmd_delete(service: &PageService, args: DeleteArgs) -> anyhow::Result<()> {
    service
        .delete_page(&PageKey::new(args.key.as_str()), args.locale.as_deref())
        .await?;
    match &args.locale {
        Some(locale) => println!("Deleted {} from {}", locale.bold(), args.key.yellow()),
        None => println!("Deleted {}", args.key.yellow()),
    }
    Ok(())
}

async fn cmd_purge(service: &PageService, args: KeyArgs) -> anyhow::Result<()> {
    service.purge_page(&PageKey::new(args.key.as_str())).await?;
    println!("Purged {}", args.key.yellow());
    Ok(())
}

async fn cmd_locales(service: &PageService, args: KeyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let locales = service.page_locales(&PageKey::new(args.key)).await?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&locales)?),
        OutputFormat::Text if locales.is_empty() => println!("Page is not localized."),
        OutputFormat::Text => {
            for locale in &locales {
                println!("  {locale}");
            }
        }
    }
    Ok(())
}

fn render_view(view: &PageView, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(view);
    }
    let mut out = format!("{}  {}\n", view.title.bold(), view.permalink.cyan());
    out.push_str(&format!("  Key:      {}\n", view.key.as_str().yellow()));
    if let Some(locale) = &view.locale {
        out.push_str(&format!("  Locale:   {locale}\n"));
    }
    if !view.description.is_empty() {
        out.push_str(&format!("  About:    {}\n", view.description));
    }
    if !view.keywords.is_empty() {
        out.push_str(&format!("  Keywords: {}\n", view.keywords));
    }
    match &view.content_key {
        Some(key) => out.push_str(&format!("  Content:  {}", key.as_str().dimmed())),
        None => out.push_str(&format!("  Content:  {}", "none".dimmed())),
    }
    Ok(out)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn view() -> PageView {
        PageView {
            key: PageKey::new("pages/1"),
            locale: Some("en-us".into()),
            title: "About".into(),
            description: String::new(),
            keywords: "team".into(),
            permalink: "/about".into(),
            content_key: None,
        }
    }

    #[test]
    fn json_view_is_camel_case() {
        let rendered = render_view(&view(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["permalink"], "/about");
        assert_eq!(value["locale"], "en-us");
        assert!(value.get("contentKey").is_none());
    }

    #[test]
    fn text_view_lists_fields() {
        colored::control::set_override(false);
        let rendered = render_view(&view(), OutputFormat::Text).unwrap();
        assert!(rendered.starts_with("About  /about"));
        assert!(rendered.contains("Keywords: team"));
        assert!(!rendered.contains("About:"));
    }

    #[tokio::test]
    async fn init_create_and_search_against_a_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("folio.toml");
        let store_path = dir.path().join("store.json");
        std::fs::write(
            &config_path,
            format!("store_path = {:?}\n", store_path.display().to_string()),
        )
        .unwrap();
        let config_arg = config_path.display().to_string();

        for args in [
            vec!["folio", "-c", config_arg.as_str(), "init"],
            vec!["folio", "-c", config_arg.as_str(), "create", "/about", "-t", "About"],
        ] {
            run_command(Cli::try_parse_from(args).unwrap()).await.unwrap();
        }

        let store = JsonFileObjectStore::open(&store_path).unwrap();
        let config = FolioConfig::load(&config_path).unwrap();
        let service = PageService::new(
            Arc::new(store),
            Arc::new(folio_pages::StaticTemplateSource::new()),
            Arc::new(InMemoryLocaleRegistry::new()),
            config.pages,
            folio_pages::LocalizationMode::Localized,
        );
        let pages = service.search(Some("About"), None).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(
            service.get_page_content(&pages[0].key, None).await.unwrap(),
            ContentDocument::empty()
        );
    }
}
