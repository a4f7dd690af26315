//! Portfolio admin CLI.
//!
//! # Responsibility
//! - Load the configured document store and expose editing and read-only
//!   views as subcommands.
//! - Keep output plain and line-oriented for scripting.

use anyhow::Context;
use clap::{Parser, Subcommand};
use portfolio_core::service::profile::ProfileEdit;
use portfolio_core::service::projects::ProjectForm;
use portfolio_core::service::skills::SkillForm;
use portfolio_core::service::timeline::{EducationForm, ExperienceForm};
use portfolio_core::{
    default_log_level, filter_projects, init_logging, project_tags, DocumentStore,
    PortfolioConfig, PortfolioEditor, ProjectFilter,
};
use std::path::PathBuf;

/// Portfolio CLI - edit and inspect the portfolio document
#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding portfolio.config.json and relative database paths
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check core linkage
    Ping,

    /// Print the whole document as JSON
    Show,

    /// List project filter tags
    Tags,

    /// List visible projects
    Projects {
        /// Only projects carrying this exact tag ("All" for every project)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Append a project
    AddProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        link: String,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Add the project hidden
        #[arg(long)]
        hidden: bool,
    },

    /// Flip a project's visibility
    ToggleProject { id: String },

    /// Remove a project
    DeleteProject { id: String },

    /// Add a skill to an existing or new category
    AddSkill {
        name: String,
        #[arg(long, default_value_t = 80)]
        level: u8,
        /// Existing category
        #[arg(long, default_value = "")]
        category: String,
        /// New category; wins over --category
        #[arg(long, default_value = "")]
        new_category: String,
    },

    /// Remove a skill; empty categories are dropped
    DeleteSkill { category: String, name: String },

    /// Append a work experience entry
    AddExperience {
        #[arg(long)]
        role: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        duration: String,
        /// Bullet point, repeatable
        #[arg(long = "bullet")]
        bullets: Vec<String>,
    },

    /// Append an education entry
    AddEducation {
        #[arg(long)]
        institution: String,
        #[arg(long)]
        degree: String,
        #[arg(long)]
        duration: String,
    },

    /// Replace one personal-info field (camelCase name)
    SetProfile { field: String, value: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Ping = cli.command {
        println!("portfolio_core ping={}", portfolio_core::ping());
        println!("portfolio_core version={}", portfolio_core::core_version());
        return Ok(());
    }

    let config = PortfolioConfig::load(&cli.dir).context("failed to load config")?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        let level = config
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("failed to start logging")?;
    }

    let backend = config
        .open_backend(&cli.dir)
        .context("failed to open backend")?;
    let store = DocumentStore::new(backend);
    let outcome = store.load();
    log::debug!(
        "event=cli_load module=cli status=ok backend={} source={}",
        store.backend_kind().as_str(),
        outcome.source.as_str()
    );

    run(cli.command, &store)?;
    store.close();
    Ok(())
}

fn run(command: Command, store: &DocumentStore) -> anyhow::Result<()> {
    let editor = PortfolioEditor::new(store);
    match command {
        Command::Ping => {}
        Command::Show => {
            let json = serde_json::to_string_pretty(&store.document())?;
            println!("{json}");
        }
        Command::Tags => {
            for tag in project_tags(&store.document().projects) {
                println!("{tag}");
            }
        }
        Command::Projects { tag } => {
            let filter = tag
                .as_deref()
                .map(ProjectFilter::parse)
                .unwrap_or_default();
            let document = store.document();
            for project in filter_projects(&document.projects, &filter) {
                println!("{}\t{}\t{}", project.id, project.name, project.tags.join(","));
            }
        }
        Command::AddProject {
            name,
            description,
            link,
            tags,
            hidden,
        } => {
            let mut form = ProjectForm::new(name, description, link, Vec::new());
            form.set_tags_from_input(&tags);
            form.visible = !hidden;
            let id = editor.add_project(&mut form)?;
            println!("{id}");
        }
        Command::ToggleProject { id } => {
            let visible = editor.toggle_project_visibility(&id)?;
            println!("{id} visible={visible}");
        }
        Command::DeleteProject { id } => editor.delete_project(&id)?,
        Command::AddSkill {
            name,
            level,
            category,
            new_category,
        } => {
            let mut form = SkillForm::for_document(&store.document());
            form.name = name;
            form.level = level;
            if !category.is_empty() {
                form.selected_category = category;
            }
            form.new_category = new_category;
            let category = editor.add_skill(&mut form)?;
            println!("{category}");
        }
        Command::DeleteSkill { category, name } => editor.delete_skill(&category, &name)?,
        Command::AddExperience {
            role,
            company,
            duration,
            bullets,
        } => {
            let mut form = ExperienceForm::new(role, company, duration, bullets);
            let id = editor.add_experience(&mut form)?;
            println!("{id}");
        }
        Command::AddEducation {
            institution,
            degree,
            duration,
        } => {
            let mut form = EducationForm::new(institution, degree, duration);
            let id = editor.add_education(&mut form)?;
            println!("{id}");
        }
        Command::SetProfile { field, value } => {
            let edit = ProfileEdit::parse(&field, &value)?;
            editor.update_personal_info_field(edit)?;
        }
    }
    Ok(())
}
