use crate::cli::{CommunityCommand, Command, ConfigCommand, ScriptsCommand, Source};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use versecraft::ai::{GeminiClient, GenerationRequest, PROMPT_EXAMPLES};
use versecraft::community::{Catalog, CatalogFilter};
use versecraft::config::{self, Config};
use versecraft::diff::{diff_lines, DiffLine, DiffSummary};
use versecraft::docs::{DocSection, Docs};
use versecraft::highlighting::{
    render_code, render_diff, render_tokens, RenderOptions, SyntaxHighlighter,
};
use versecraft::store::{format_time_ago, format_timestamp, SavedScript, ScriptStore};

pub struct App {
    config: Config,
    store: ScriptStore,
    highlighter: SyntaxHighlighter,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = config::load();
        let store = ScriptStore::open_default().context("Failed to locate the script library")?;

        let mut highlighter = SyntaxHighlighter::with_theme(&config.syntax_theme, config.lexicon());
        highlighter.set_enabled(config.syntax_highlighting);

        Ok(Self {
            config,
            store,
            highlighter,
        })
    }

    pub fn run(mut self, command: Command) -> Result<()> {
        match command {
            Command::Highlight {
                source,
                plain,
                no_line_numbers,
                highlight_lines,
            } => {
                let code = self.read_source(&Source::parse(&source))?;
                if plain {
                    println!("{}", render_tokens(&self.highlighter.highlight(&code)));
                } else {
                    self.print_code(&code, !no_line_numbers, highlight_lines);
                }
            }
            Command::Diff {
                old,
                new,
                json,
                no_color,
            } => {
                let old_text = self.read_source(&Source::parse(&old))?;
                let new_text = self.read_source(&Source::parse(&new))?;
                let lines = diff_lines(&old_text, &new_text);
                if json {
                    println!("{}", serde_json::to_string_pretty(&lines)?);
                } else {
                    print_diff(&lines, !no_color);
                }
            }
            Command::Scripts { action } => self.run_scripts(action)?,
            Command::Community { action } => self.run_community(action)?,
            Command::Docs { section, query } => self.run_docs(section, query)?,
            Command::Generate { examples: true, .. } => {
                for example in PROMPT_EXAMPLES {
                    println!("{}", example);
                }
            }
            Command::Generate {
                prompt,
                examples: _,
                model,
                temperature,
                continue_from,
                edit,
                instructions,
                insert,
                no_save,
            } => {
                let Some(prompt) = prompt else {
                    bail!("A prompt is required");
                };
                let request = GenerationRequest {
                    prompt,
                    model: model.or_else(|| Some(self.config.ai_model.clone())),
                    temperature: temperature.or(Some(self.config.temperature)),
                    continue_code: continue_from.as_deref().map(read_file).transpose()?,
                    edit_instructions: instructions,
                    insert_code: edit
                        .as_deref()
                        .or(insert.as_deref())
                        .map(read_file)
                        .transpose()?,
                };
                self.generate(&request, !no_save)?;
            }
            Command::Config { action } => self.run_config(action)?,
        }

        Ok(())
    }

    fn run_scripts(&self, action: ScriptsCommand) -> Result<()> {
        match action {
            ScriptsCommand::List { query } => {
                let scripts = match query {
                    Some(q) => self.store.search(&q),
                    None => self.store.load(),
                };
                if scripts.is_empty() {
                    println!("No saved scripts yet. Generated code will appear here.");
                }
                let now = Utc::now();
                for script in &scripts {
                    println!(
                        "{}  {}  ({} • {})",
                        script.short_id(),
                        script.title,
                        format_time_ago(script.timestamp, now),
                        script.model_label()
                    );
                }
            }
            ScriptsCommand::Show { id } => {
                let script = self.store.get(&id)?;
                println!("{}", script.title);
                println!(
                    "Saved {} with {} at temperature {}\n",
                    format_timestamp(script.timestamp),
                    script.model,
                    script.temperature
                );
                self.print_code(&script.content, self.config.show_line_numbers, Vec::new());
            }
            ScriptsCommand::Add {
                file,
                title,
                prompt,
            } => {
                let content = self.read_source(&Source::parse(&file))?;
                let prompt = prompt.unwrap_or_else(|| title.clone());
                let script = SavedScript::new(
                    &title,
                    &content,
                    &prompt,
                    &self.config.ai_model,
                    self.config.temperature,
                );
                let id = script.id.clone();
                self.store.insert(script)?;
                println!("Saved script {}", id);
            }
            ScriptsCommand::Update {
                id,
                file,
                description,
            } => {
                let content = self.read_source(&Source::parse(&file))?;
                let script = self
                    .store
                    .update_content(&id, &content, &description, &author_name())?;
                println!(
                    "Updated {} ({} earlier versions)",
                    script.short_id(),
                    script.versions.len()
                );
            }
            ScriptsCommand::History { id } => {
                let script = self.store.get(&id)?;
                println!(
                    "Current version  {}  {}",
                    format_timestamp(script.timestamp),
                    script.title
                );
                if script.versions.is_empty() {
                    println!("No earlier versions.");
                }
                for version in script.versions.iter().rev() {
                    println!(
                        "Version {}  {}  {}  by {}",
                        version.id,
                        format_timestamp(version.timestamp),
                        version.description,
                        version.author_name
                    );
                }
            }
            ScriptsCommand::Diff {
                id,
                version,
                no_color,
            } => {
                let lines = self.store.diff_version(&id, version)?;
                print_diff(&lines, !no_color);
            }
            ScriptsCommand::Restore { id, version } => {
                let script = self.store.restore_version(&id, version, &author_name())?;
                println!("Restored {} to version {}", script.short_id(), version);
            }
            ScriptsCommand::Delete { id } => {
                let script = self.store.delete(&id)?;
                println!("Deleted {} ({})", script.short_id(), script.title);
            }
        }
        Ok(())
    }

    fn run_community(&self, action: CommunityCommand) -> Result<()> {
        match action {
            CommunityCommand::List {
                query,
                tags,
                sort,
                catalog,
            } => {
                let catalog = load_catalog(catalog.as_deref())?;
                let filter = CatalogFilter {
                    query: query.unwrap_or_default(),
                    tags,
                    sort,
                };
                let scripts = catalog.browse(&filter);
                println!("{} scripts found", scripts.len());
                for script in scripts {
                    println!(
                        "{}  {} by {}  [+{} -{}, {} downloads, {} stars]  {}",
                        script.id,
                        script.title,
                        script.author,
                        script.votes.upvotes,
                        script.votes.downvotes,
                        script.downloads,
                        script.stars,
                        script.tags.join(", ")
                    );
                }
            }
            CommunityCommand::Show { id, catalog } => {
                let catalog = load_catalog(catalog.as_deref())?;
                let script = catalog.get(&id)?;
                println!("{} by {}", script.title, script.author);
                println!("{}\n", script.description);
                self.print_code(&script.code, self.config.show_line_numbers, Vec::new());
            }
            CommunityCommand::Tags { catalog } => {
                for tag in load_catalog(catalog.as_deref())?.all_tags() {
                    println!("{}", tag);
                }
            }
            CommunityCommand::Save { id, catalog } => {
                let catalog = load_catalog(catalog.as_deref())?;
                let shared = catalog.get(&id)?;
                let script = SavedScript::new(
                    &shared.title,
                    &shared.code,
                    &shared.description,
                    "community",
                    self.config.temperature,
                );
                let saved_id = script.id.clone();
                self.store.insert(script)?;
                println!("Saved '{}' as {}", shared.title, saved_id);
            }
        }
        Ok(())
    }

    fn run_docs(&self, section: Option<String>, query: Option<String>) -> Result<()> {
        let docs = Docs::bundled().context("Bundled documentation is invalid")?;

        if let Some(id) = section {
            self.print_section(docs.get(&id)?);
            return Ok(());
        }

        match query {
            Some(query) => {
                let sections = docs.search(&query);
                if sections.is_empty() {
                    println!("No documentation matches '{}'", query);
                }
                for section in sections {
                    self.print_section(section);
                }
            }
            None => {
                for section in docs.sections() {
                    println!("{:<12} {}", section.id, section.title);
                }
            }
        }
        Ok(())
    }

    fn print_section(&self, section: &DocSection) {
        println!("{}\n", section.title);
        println!("{}\n", section.content);
        for example in &section.examples {
            println!("{}", example.title);
            self.print_code(&example.code, self.config.show_line_numbers, Vec::new());
        }
    }

    fn run_config(&mut self, action: ConfigCommand) -> Result<()> {
        match action {
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&self.config)?),
            ConfigCommand::Set { key, value } => {
                self.config.set(&key, &value)?;
                config::save(&self.config).context("Could not save settings")?;
                info!(key = %key, "setting updated");
                println!("{} = {}", key, value);
            }
            ConfigCommand::Path => match config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => bail!("Could not determine config directory"),
            },
        }
        Ok(())
    }

    fn generate(&self, request: &GenerationRequest, save: bool) -> Result<()> {
        let client = GeminiClient::from_env()?;
        let response = client
            .generate(request)
            .context("Failed to generate Verse code")?;

        self.print_code(&response.content, self.config.show_line_numbers, Vec::new());

        if save && self.config.auto_save {
            let script = response.to_saved_script(request);
            let id = script.id.clone();
            if let Err(e) = self.store.insert(script) {
                warn!("could not save generated script: {}", e);
            } else {
                eprintln!("Saved as {}", id);
            }
        }
        Ok(())
    }

    fn read_source(&self, source: &Source) -> Result<String> {
        match source {
            Source::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read stdin")?;
                Ok(buf)
            }
            Source::File(path) => read_file(path),
            Source::Script(id) => Ok(self.store.get(id)?.content),
        }
    }

    fn print_code(&self, code: &str, line_numbers: bool, marked_lines: Vec<usize>) {
        let lines = self.highlighter.highlight(code);
        let options = RenderOptions {
            line_numbers,
            marked_lines,
        };
        println!("{}", render_code(&lines, &options));
    }
}

fn print_diff(lines: &[DiffLine], color: bool) {
    print!("{}", render_diff(lines, color));
    let summary = DiffSummary::from_lines(lines);
    if summary.is_identical() {
        println!("No differences.");
    } else {
        println!(
            "{} added, {} removed, {} unchanged",
            summary.added, summary.removed, summary.unchanged
        );
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::bundled().context("Bundled catalog is invalid")?,
    };
    Ok(catalog)
}

fn author_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "local".to_string())
}
