//! User-facing console output.
//!
//! Everything here goes to stdout; diagnostics go through `tracing` on stderr.
//! The `*_line` / `render_*` helpers build the text so it can be tested, the
//! `print_*` functions just write it.

use std::path::Path;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::MigrateError;
use crate::migrate::{MigrationPlan, MigrationReport, UploadOutcome, UploadSummary};
use crate::remote::RemoteBlob;
use crate::storage::StorageError;

pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

pub fn upload_line(index: usize, total: usize, outcome: &UploadOutcome) -> String {
    let local = outcome.local_path.display();
    match &outcome.result {
        Ok(size) => format!(
            "✅ [{:2}/{}] {} → {} ({})",
            index,
            total,
            local,
            outcome.blob_name,
            format_size(*size)
        ),
        Err(err) => format!("❌ [{:2}/{}] {}: {}", index, total, local, err),
    }
}

pub fn render_summary(summary: &UploadSummary) -> String {
    let total = summary.total();
    format!(
        "📊 Upload summary:\n   ✅ Succeeded: {}/{}\n   ❌ Failed: {}/{}",
        summary.succeeded(),
        total,
        summary.failed(),
        total
    )
}

pub fn render_remote_blobs(blobs: &[RemoteBlob]) -> String {
    if blobs.is_empty() {
        return "   No terraform.tfstate files found".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Blob", "Size"]);
    for (i, blob) in blobs.iter().enumerate() {
        builder.push_record([(i + 1).to_string(), blob.name.clone(), format_size(blob.size)]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn render_report(report: &MigrationReport) -> String {
    if report.confirmed > 0 {
        format!(
            "🎯 Migration completed successfully!\n   📤 {} terraform.tfstate files in the container",
            report.confirmed
        )
    } else {
        "⚠️  Migration finished, but no file was confirmed in the container".to_string()
    }
}

pub fn abort_line(err: &MigrateError) -> String {
    match err {
        MigrateError::NoStateFiles { .. } => "❌ No terraform.tfstate files found".to_string(),
        MigrateError::NoNumericDirectories => {
            "❌ No directory starting with a digit found".to_string()
        }
        MigrateError::InvalidCredential => "❌ ERROR: connection string not configured! \
Set AZURE_STORAGE_CONNECTION_STRING or pass --connection-string."
            .to_string(),
        MigrateError::Connection(_) | MigrateError::ContainerNotFound(_) => {
            format!("💥 {}. Aborting...", err)
        }
        MigrateError::UploadFailed { .. } => "💥 Uploading the state files failed!".to_string(),
        MigrateError::Render(_) => format!("❌ {}", err),
    }
}

pub fn print_start(root: &Path) {
    println!("🚀 Starting tfstate migration to Azure Blob Storage...");
    println!("Working directory: {}", root.display());
}

pub fn print_plan(plan: &MigrationPlan) {
    if plan.state_files.is_empty() {
        return;
    }

    println!("\n📁 State files found:");
    for file in &plan.state_files {
        println!("  - {}", file.relative_path.display());
    }

    if plan.numeric_directories.is_empty() {
        return;
    }

    println!(
        "\n📋 Numeric directories found ({}):",
        plan.numeric_directories.len()
    );
    for (i, dir) in plan.numeric_directories.iter().enumerate() {
        println!("  {:2}. {}", i + 1, dir);
    }
}

pub fn print_connecting() {
    println!("\n🔄 Connecting to Azure Blob Storage...");
}

pub fn print_connected(container_count: usize) {
    println!("✅ Connection established. Containers found: {}", container_count);
}

pub fn print_container_found(container: &str) {
    println!("✅ Container '{}' found", container);
}

pub fn print_upload_start(total: usize) {
    println!("\n📤 Uploading {} terraform.tfstate files...", total);
}

pub fn print_upload_line(index: usize, total: usize, outcome: &UploadOutcome) {
    println!("{}", upload_line(index, total, outcome));
}

pub fn print_upload_summary(summary: &UploadSummary) {
    println!("\n{}", render_summary(summary));
}

pub fn print_upload_done() {
    println!("\n🎉 Upload complete!");
}

pub fn print_listing_header(container: &str) {
    println!("\n📋 Files in container '{}':", container);
}

pub fn print_remote_blobs(blobs: &[RemoteBlob]) {
    println!("{}", render_remote_blobs(blobs));
}

pub fn print_listing_error(err: &StorageError) {
    println!("❌ Failed to list files: {}", err);
}

pub fn print_report(report: &MigrationReport) {
    println!("\n{}", render_report(report));
}

pub fn print_abort(err: &MigrateError) {
    println!("\n{}", abort_line(err));
}
