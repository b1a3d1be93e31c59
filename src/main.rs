//! Veles CLI - Command-line tool for PAK game archive inspection and extraction.
//!
//! This is the main entry point for the Veles command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use veles::assets::discover;
use veles::prelude::*;

/// Veles - PAK game archive inspection and extraction tool
#[derive(Parser)]
#[command(name = "veles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the archive is and how to open it.
#[derive(Args)]
struct ArchiveArgs {
    /// Path to the PAK file
    #[arg(short, long, env = "VELES_PAK")]
    pak: PathBuf,

    /// AES-256 key as 64 hex digits (optional 0x prefix)
    #[arg(short, long, env = "VELES_AES_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Warn instead of failing when the index digest does not match
    #[arg(long)]
    lenient_index: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header and summary information for a PAK archive
    Info {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List contents of a PAK archive
    List {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Filter pattern (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,

        /// Print as JSON
        #[arg(long, conflicts_with = "detailed")]
        json: bool,
    },

    /// Extract files from a PAK archive
    Extract {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Output directory
        #[arg(short, long, env = "VELES_OUTPUT")]
        output: PathBuf,

        /// Filter pattern (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Only extract entries under the known content roots
        #[arg(long)]
        priority: bool,
    },

    /// Group archive contents by asset category
    Classify {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Print every classified path, not just the summary
        #[arg(short, long)]
        detailed: bool,

        /// Print as JSON
        #[arg(long, conflicts_with = "detailed")]
        json: bool,
    },

    /// Find PAK files in a game directory
    Scan {
        /// Game install or Paks directory
        #[arg(short, long)]
        dir: PathBuf,

        /// Only show the season content chunks
        #[arg(short, long)]
        season: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { archive, json } => {
            cmd_info(&archive, json)?;
        }
        Commands::List {
            archive,
            filter,
            detailed,
            json,
        } => {
            cmd_list(&archive, filter.as_deref(), detailed, json)?;
        }
        Commands::Extract {
            archive,
            output,
            filter,
            priority,
        } => {
            cmd_extract(&archive, &output, filter.as_deref(), priority)?;
        }
        Commands::Classify {
            archive,
            detailed,
            json,
        } => {
            cmd_classify(&archive, detailed, json)?;
        }
        Commands::Scan { dir, season } => {
            cmd_scan(&dir, season)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_archive(args: &ArchiveArgs) -> Result<PakArchive> {
    let mut options = OpenOptions::new();
    if let Some(key) = &args.key {
        let key: AesKey = key.parse().context("Invalid AES key")?;
        options = options.key(key);
    }
    if args.lenient_index {
        options = options.index_integrity(IntegrityPolicy::Warn);
    }

    let start = Instant::now();
    let archive = PakArchive::open_with(&args.pak, options)
        .with_context(|| format!("Failed to open PAK archive {}", args.pak.display()))?;
    debug!(entries = archive.len(), elapsed = ?start.elapsed(), "archive loaded");

    Ok(archive)
}

fn cmd_info(args: &ArchiveArgs, json: bool) -> Result<()> {
    let archive = open_archive(args)?;
    let header = archive.header();
    let stats = archive.stats();

    if json {
        let info = serde_json::json!({
            "name": archive.name(),
            "header": header,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Archive:           {}", archive.name());
    println!("Version:           {}", header.version);
    println!("Index:             {} bytes at {}", header.index_size, header.index_offset);
    println!("Index digest:      {}", header.index_digest);
    println!("Index encrypted:   {}", header.encrypted);
    println!("Default method:    {}", header.compression.name());
    println!("Entries:           {}", stats.entries);
    println!("Encrypted entries: {}", stats.encrypted_entries);
    println!("Block entries:     {}", stats.block_entries);
    println!("Compressed size:   {}", stats.compressed_bytes);
    println!("Uncompressed size: {}", stats.uncompressed_bytes);

    Ok(())
}

fn cmd_list(args: &ArchiveArgs, filter: Option<&str>, detailed: bool, json: bool) -> Result<()> {
    let archive = open_archive(args)?;
    let matcher = PathFilter::new(filter)?;

    let entries: Vec<&EntryRecord> = archive
        .entries()
        .iter()
        .filter(|e| matcher.matches(e.path()))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        if detailed {
            println!(
                "{:>12} {:>12} {:<7} {} {}",
                entry.compressed_size(),
                entry.uncompressed_size(),
                entry.compression_method().name(),
                if entry.is_encrypted() { "E" } else { " " },
                entry.path()
            );
        } else {
            println!("{}", entry.path());
        }
    }

    println!("\nTotal: {} entries", entries.len());

    Ok(())
}

fn cmd_extract(args: &ArchiveArgs, output: &Path, filter: Option<&str>, priority: bool) -> Result<()> {
    println!("Opening PAK archive: {}", args.pak.display());

    let start = Instant::now();
    let archive = open_archive(args)?;
    println!("Loaded {} entries in {:?}", archive.len(), start.elapsed());

    let matcher = PathFilter::new(filter)?;
    let table = ClassifierTable::fortnite();

    let selected: Vec<&EntryRecord> = archive
        .entries()
        .iter()
        .filter(|e| matcher.matches(e.path()))
        .filter(|e| !priority || table.is_known(e.path()))
        .collect();

    println!("Extracting {} entries...", selected.len());

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let start = Instant::now();
    let summary = extract_entries(&archive, &selected, output, &pb)?;

    pb.finish_with_message("Done");
    println!(
        "Extracted {} entries in {:?} ({} errors)",
        summary.extracted,
        start.elapsed(),
        summary.errors
    );

    summary.ensure_complete()
}

/// Counts from writing a set of entries to disk.
#[derive(Debug, Default, PartialEq, Eq)]
struct ExtractSummary {
    extracted: usize,
    errors: usize,
}

impl ExtractSummary {
    /// Fail when any entry was skipped or could not be extracted.
    fn ensure_complete(&self) -> Result<()> {
        if self.errors > 0 {
            anyhow::bail!(
                "{} of {} entries failed to extract",
                self.errors,
                self.extracted + self.errors
            );
        }
        Ok(())
    }
}

/// Write `entries` under `output`, continuing past per-entry failures.
///
/// Entries whose path would leave `output` are skipped and counted as errors.
fn extract_entries(
    archive: &PakArchive,
    entries: &[&EntryRecord],
    output: &Path,
    pb: &ProgressBar,
) -> Result<ExtractSummary> {
    let mut summary = ExtractSummary::default();

    for entry in entries {
        pb.inc(1);

        let Some(relative) = entry.output_path() else {
            pb.suspend(|| eprintln!("Skipping unsafe path: {}", entry.path()));
            summary.errors += 1;
            continue;
        };
        let output_path = output.join(relative);

        match archive.extract_entry(entry) {
            Ok(data) => {
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, data)
                    .with_context(|| format!("Failed to write {}", output_path.display()))?;
                summary.extracted += 1;
            }
            Err(e) => {
                pb.suspend(|| eprintln!("Error extracting {}: {}", entry.path(), e));
                summary.errors += 1;
            }
        }
    }

    Ok(summary)
}

fn cmd_classify(args: &ArchiveArgs, detailed: bool, json: bool) -> Result<()> {
    let archive = open_archive(args)?;
    let catalog = AssetCatalog::from_archive(&archive, &ClassifierTable::fortnite(), &NamingTables::season5());

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for (category, count) in catalog.counts() {
        println!("{:<10} {:>8}", category, count);
        if detailed {
            for path in catalog.category(category) {
                println!("    {}", path);
            }
        }
    }

    if !catalog.npcs().is_empty() {
        println!("\nNPCs:");
        for npc in catalog.npcs() {
            println!("  {:<18} {}", npc.name, npc.path);
        }
    }

    if !catalog.exotic_weapons().is_empty() {
        println!("\nExotic weapons:");
        for weapon in catalog.exotic_weapons() {
            println!("  {:<18} {}", weapon.name, weapon.path);
        }
    }

    Ok(())
}

fn cmd_scan(dir: &Path, season: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let paks = if season {
        discover::find_season_paks(dir)
    } else {
        discover::find_pak_files(dir)
    };

    for path in &paks {
        let status = if PakArchive::is_valid(path) { "ok" } else { "invalid" };
        if status == "invalid" {
            warn!(path = %path.display(), "not a supported PAK archive");
        }
        println!("{:<8} {}", status, path.display());
    }

    println!("\nTotal: {} PAK files", paks.len());

    Ok(())
}

/// Glob filter over archive paths; no pattern matches everything.
struct PathFilter(Option<Pattern>);

impl PathFilter {
    const OPTIONS: MatchOptions = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern
            .map(|p| Pattern::new(&p.replace('\\', "/")))
            .transpose()
            .context("Invalid filter pattern")?;
        Ok(Self(pattern))
    }

    fn matches(&self, path: &str) -> bool {
        self.0
            .as_ref()
            .map_or(true, |pattern| pattern.matches_with(path, Self::OPTIONS))
    }
}

#[cfg(test)]
mod tests {
    use veles::common::IntoBytes;
    use veles::pak::format::{RawEntryRecord, RawPakHeader, HEADER_SIZE, PAK_MAGIC};

    use super::*;

    /// Minimal version 1520 archive of stored entries.
    fn stored_pak(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];
        let mut index = Vec::new();

        for (path, data) in entries {
            let record = RawEntryRecord {
                offset: out.len() as u64,
                compressed_size: data.len() as u64,
                uncompressed_size: data.len() as u64,
                compression_method: 0,
                sha1: *Sha1Digest::compute(data).as_bytes(),
                encrypted: 0,
                block_count: 0,
            };
            out.extend_from_slice(data);

            index.extend_from_slice(&(path.len() as u32).to_le_bytes());
            index.extend_from_slice(path.as_bytes());
            index.extend_from_slice(record.as_bytes());
        }

        let header = RawPakHeader {
            version: 1520,
            index_offset: out.len() as u64,
            index_size: index.len() as u64,
            index_sha1: *Sha1Digest::compute(&index).as_bytes(),
            encrypted: 0,
            compression_method: 0,
        };

        out.extend_from_slice(&index);
        out[..PAK_MAGIC.len()].copy_from_slice(&PAK_MAGIC);
        out[PAK_MAGIC.len()..HEADER_SIZE].copy_from_slice(header.as_bytes());
        out
    }

    #[test]
    fn test_extract_skips_paths_outside_output() {
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("out").join("nested");
        fs::create_dir_all(&output).unwrap();

        let data = stored_pak(&[
            ("../../evil.txt", &b"evil"[..]),
            ("FortniteGame/Content/Weapons/boom_sniper.uasset", &b"sniper"[..]),
        ]);
        let archive = PakArchive::from_bytes(data, OpenOptions::default()).unwrap();
        let entries: Vec<&EntryRecord> = archive.entries().iter().collect();

        let summary = extract_entries(&archive, &entries, &output, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary, ExtractSummary { extracted: 1, errors: 1 });
        assert!(!root.path().join("evil.txt").exists());
        assert_eq!(
            fs::read(output.join("FortniteGame/Content/Weapons/boom_sniper.uasset")).unwrap(),
            b"sniper"
        );
        assert!(summary.ensure_complete().is_err());
    }

    #[test]
    fn test_complete_extraction_succeeds() {
        let output = tempfile::tempdir().unwrap();
        let archive =
            PakArchive::from_bytes(stored_pak(&[("a/b.txt", &b"b"[..])]), OpenOptions::default()).unwrap();
        let entries: Vec<&EntryRecord> = archive.entries().iter().collect();

        let summary = extract_entries(&archive, &entries, output.path(), &ProgressBar::hidden()).unwrap();

        assert_eq!(summary, ExtractSummary { extracted: 1, errors: 0 });
        assert!(summary.ensure_complete().is_ok());
    }
}
