use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the epubpro CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist", value_parser = clap::value_parser!(std::path::PathBuf))]
    output_dir: PathBuf,

    /// Artifacts to generate. Defaults to all of them.
    #[arg(short, long, value_enum, value_delimiter = ',')]
    only: Vec<Artifact>,

    /// Shells to generate completions for.
    #[arg(long, value_enum, value_delimiter = ',', default_value = "bash,zsh,fish")]
    shells: Vec<Shell>,
  },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Artifact {
  Completions,
  Manpage,
  /// Commented default configuration files.
  Config,
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();

  match xtask.command {
    Commands::Dist {
      output_dir,
      only,
      shells,
    } => {
      let wanted = |artifact| only.is_empty() || only.contains(&artifact);
      if wanted(Artifact::Completions) {
        generate_completions(&output_dir, &shells)?;
      }
      if wanted(Artifact::Manpage) {
        generate_manpage(&output_dir)?;
      }
      if wanted(Artifact::Config) {
        generate_config_samples(&output_dir)?;
      }
    },
  }

  Ok(())
}

fn generate_completions(output_dir: &Path, shells: &[Shell]) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir)?;
  let mut cmd = epubpro::cli::Cli::command();
  for shell in shells {
    generate_to(*shell, &mut cmd, "epubpro", &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
  }
  println!(
    "Shell completions generated in {}",
    completions_dir.display()
  );
  Ok(())
}

/// Generate the `epubpro(1)` manpage.
fn generate_manpage(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)?;
  let man = Man::new(epubpro::cli::Cli::command());
  let file_path = man_dir.join("epubpro.1");
  let mut file = fs::File::create(&file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  man
    .render(&mut file)
    .with_context(|| "Failed to render manpage")?;
  println!("Manpage generated in {}", man_dir.display());
  Ok(())
}

fn generate_config_samples(output_dir: &Path) -> Result<()> {
  let config_dir = output_dir.join("config");
  fs::create_dir_all(&config_dir)?;
  for format in ["toml", "json"] {
    let template = epubpro_config::templates::get_template(format)?;
    let path = config_dir.join(format!("epubpro.{format}"));
    fs::write(&path, template)
      .with_context(|| format!("Failed to write {}", path.display()))?;
  }
  println!("Sample configuration written to {}", config_dir.display());
  Ok(())
}
