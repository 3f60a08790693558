//! Rendering of registry results for the terminal
//!
//! JSON output is the serde form of the typed results; text output is a
//! compact human-readable layout.

use crate::catalog::{PaginatedResult, TagPage};
use crate::error::Result;
use crate::image::{Catalog, ImageConfig, ImageInfo, Manifest, RepositoryInfo};
use crate::logging::format_size;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `sha256:` digests shortened to 12 characters for display. Digests come
/// from manifest bodies, so the cut must land on a char boundary.
pub fn short_digest(digest: &str) -> &str {
    match digest.strip_prefix("sha256:") {
        Some(hex) => match hex.char_indices().nth(12) {
            Some((cut, _)) => &digest[..7 + cut],
            None => digest,
        },
        None => digest,
    }
}

fn page_footer(out: &mut String, page: usize, total_pages: usize, total: usize, skipped: usize) {
    let _ = write!(out, "page {}/{} ({} total)", page, total_pages.max(1), total);
    if skipped > 0 {
        let _ = write!(out, ", {} unreadable skipped", skipped);
    }
    out.push('\n');
}

pub fn catalog_text(catalog: &Catalog) -> String {
    let mut out = String::new();
    for name in &catalog.repositories {
        let _ = writeln!(out, "{}", name);
    }
    let _ = writeln!(out, "{} repositories", catalog.repositories.len());
    out
}

pub fn repositories_text(result: &PaginatedResult<Vec<RepositoryInfo>>) -> String {
    let mut out = String::new();
    let width = result
        .data
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("REPOSITORY".len());

    let _ = writeln!(out, "{:<width$}  TAGS", "REPOSITORY", width = width);
    for repo in &result.data {
        let _ = writeln!(out, "{:<width$}  {}", repo.name, repo.tag_count, width = width);
    }
    page_footer(&mut out, result.page, result.total_pages, result.total, result.skipped);
    out
}

pub fn tags_text(result: &PaginatedResult<TagPage>) -> String {
    let mut out = String::new();
    for tag in &result.data.tags {
        let _ = writeln!(out, "{}:{}", result.data.name, tag);
    }
    page_footer(&mut out, result.page, result.total_pages, result.total, 0);
    out
}

pub fn manifest_text(manifest: &Manifest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Digest:     {}", manifest.digest);
    let _ = writeln!(out, "Media type: {}", manifest.media_type);
    let _ = writeln!(
        out,
        "Config:     {} ({})",
        short_digest(&manifest.config.digest),
        format_size(manifest.config.size)
    );
    let _ = writeln!(out, "Layers:     {}", manifest.layers.len());
    for (i, layer) in manifest.layers.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. {}  {}",
            i + 1,
            short_digest(&layer.digest),
            format_size(layer.size)
        );
    }
    let _ = writeln!(out, "Total size: {}", format_size(manifest.total_size));
    out
}

pub fn config_text(config: &ImageConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Platform:   {}/{}", config.os, config.architecture);
    if let Some(created) = &config.created {
        let _ = writeln!(out, "Created:    {}", created);
    }
    if let Some(author) = config.author.as_deref().filter(|a| !a.is_empty()) {
        let _ = writeln!(out, "Author:     {}", author);
    }
    if let Some(entrypoint) = &config.config.entrypoint {
        let _ = writeln!(out, "Entrypoint: {}", entrypoint.join(" "));
    }
    if let Some(cmd) = &config.config.cmd {
        let _ = writeln!(out, "Cmd:        {}", cmd.join(" "));
    }
    if let Some(env) = &config.config.env {
        let _ = writeln!(out, "Env:");
        for var in env {
            let _ = writeln!(out, "  {}", var);
        }
    }
    if let Some(ports) = &config.config.exposed_ports {
        let ports: Vec<&str> = ports.keys().map(String::as_str).collect();
        let _ = writeln!(out, "Ports:      {}", ports.join(", "));
    }
    if let Some(labels) = &config.config.labels {
        let _ = writeln!(out, "Labels:");
        for (key, value) in labels {
            let _ = writeln!(out, "  {}={}", key, value);
        }
    }
    if !config.history.is_empty() {
        let _ = writeln!(out, "History:");
        for entry in &config.history {
            let marker = if entry.empty_layer { " " } else { "+" };
            let _ = writeln!(out, "  {} {}", marker, entry.command());
        }
    }
    out
}

pub fn image_info_text(info: &ImageInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Image:      {}:{}", info.name, info.tag);
    let _ = writeln!(out, "Size:       {} in {} layers", format_size(info.total_size), info.layer_count);
    out.push_str(&manifest_text(&info.manifest));
    out.push_str(&config_text(&info.config));
    out
}
