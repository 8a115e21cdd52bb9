// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio: command-line front end. Each subcommand drives one tool session:
// select and validate files, (for merge) thumbnail and rearrange them, run
// the operation off the async runtime, and write the results.

pub mod cli;
mod input;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use folio_core::human_errors::{HumanError, humanize_error};
use folio_core::tools::{all_tools, search_tools};
use folio_core::{
    Arrangement, FileValidator, FolioError, SelectMode, ToolConfig, ToolId, ToolSession,
    UploadFile,
};
use folio_document::{DocumentInfo, Dispatcher, Operation, PageRasterizer, generate_thumbnails};
use serde::Serialize;
use tracing::{debug, info};

pub use cli::{Cli, Command, Move};

/// Cosmetic progress step shown once the operation has been handed off.
const PROGRESS_STEP: f32 = 10.0;

/// Run one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ToolConfig::default(),
    };
    let app = App {
        dispatcher: Dispatcher::new(config, rasterizer()),
        out_dir: cli.out_dir,
    };

    match cli.command {
        Command::Merge { files, moves } => app.merge(&files, &moves).await,
        Command::Split { file } => app.single(Operation::Split, file).await,
        Command::Extract { file, pages } => {
            app.single(Operation::ExtractPages { pages }, file).await
        }
        Command::Remove { file, pages } => {
            app.single(Operation::RemovePages { pages }, file).await
        }
        Command::Rearrange { file, order } => {
            app.single(Operation::RearrangePages { order }, file).await
        }
        Command::Rotate { file, degrees } => app.single(Operation::Rotate(degrees), file).await,
        Command::Watermark { file, text } => {
            app.single(Operation::Watermark { text }, file).await
        }
        Command::PageNumbers { file } => app.single(Operation::PageNumbers, file).await,
        Command::ImagesToPdf { files } => {
            let files = input::load_files(&files).await?;
            app.process(Operation::ImagesToPdf, files, SelectMode::Multiple).await
        }
        Command::PdfToImages { file } => app.single(Operation::PdfToImages, file).await,
        Command::Overlay { base, overlay } => {
            let files = input::load_files(&[base, overlay]).await?;
            app.process(Operation::Overlay, files, SelectMode::Multiple).await
        }
        Command::Redact { file } => app.single(Operation::Redact, file).await,
        Command::Create { title, text, text_file } => {
            let text = match (text, text_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => bail!("--text or --text-file is required"),
            };
            app.create(title, text).await
        }
        Command::Compress { file } => app.single(Operation::Compress, file).await,
        Command::Tool { slug, file } => {
            let tool = ToolId::from_slug(&slug).ok_or_else(|| anyhow!("unknown tool `{slug}`"))?;
            let descriptor = tool.descriptor();
            if descriptor.implemented {
                bail!("{} has its own subcommand; see `folio --help`", descriptor.name);
            }
            app.single(Operation::PassThrough(tool), file).await
        }
        Command::Thumbnails { files } => app.thumbnails(&files).await,
        Command::Info { files } => info_command(&files).await,
        Command::Tools { search, category } => {
            list_tools(&search, category.map(Into::into));
            Ok(())
        }
    }
}

#[cfg(feature = "pdfium")]
fn rasterizer() -> Arc<dyn PageRasterizer> {
    match folio_document::PdfiumRasterizer::init() {
        Ok(pdfium) => Arc::new(pdfium),
        Err(err) => {
            tracing::warn!(error = %err, "pdfium unavailable; previews show page outlines only");
            Arc::new(folio_document::FrameRasterizer)
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn rasterizer() -> Arc<dyn PageRasterizer> {
    Arc::new(folio_document::FrameRasterizer)
}

struct App {
    dispatcher: Dispatcher,
    out_dir: PathBuf,
}

impl App {
    async fn single(&self, operation: Operation, file: PathBuf) -> Result<()> {
        let files = vec![input::load_file(&file).await?];
        self.process(operation, files, SelectMode::Single).await
    }

    /// Validate, run, and write.
    async fn process(&self, operation: Operation, files: Vec<UploadFile>, mode: SelectMode) -> Result<()> {
        let session = self.select(operation.tool(), files, mode)?;
        self.execute(session, operation).await
    }

    async fn merge(&self, paths: &[PathBuf], moves: &[Move]) -> Result<()> {
        let files = input::load_files(paths).await?;
        let mut session = self.select(ToolId::Merge, files, SelectMode::Multiple)?;

        if !moves.is_empty() {
            let items = generate_thumbnails(
                session.batch().files().to_vec(),
                self.dispatcher.rasterizer(),
                self.dispatcher.config().thumbnail_scale,
            )
            .await;
            let mut arrangement = Arrangement::new(items);
            for step in moves {
                apply_move(&mut arrangement, *step)?;
            }

            let ordered = arrangement.files();
            if ordered.len() == session.batch().len() {
                session.reorder(ordered)?;
            } else {
                session.reset();
                session.select(ordered).map_err(|err| present(&humanize_error(&err)))?;
            }
            let names: Vec<&str> = session.batch().files().iter().map(|f| f.name.as_str()).collect();
            info!(order = ?names, "Files arranged");
        }

        self.execute(session, Operation::Merge).await
    }

    async fn create(&self, title: String, text: String) -> Result<()> {
        let operation = Operation::CreateFromText { title, text };
        let dispatcher = self.dispatcher.clone();
        let task = operation.clone();
        let result = tokio::task::spawn_blocking(move || dispatcher.run(&task, &[]))
            .await
            .context("operation task failed")?
            .map_err(|err| present(&humanize_error(&err)))?;

        let written =
            output::write_result(&self.out_dir, operation.tool().descriptor().output_name, &result)
                .await?;
        print_paths(&written);
        Ok(())
    }

    async fn thumbnails(&self, paths: &[PathBuf]) -> Result<()> {
        #[derive(Serialize)]
        struct Thumbnail<'a> {
            id: &'a str,
            name: &'a str,
            thumbnail: &'a str,
        }

        let files = input::load_files(paths).await?;
        let session = self.select(ToolId::Merge, files, SelectMode::Multiple)?;
        let items = generate_thumbnails(
            session.batch().files().to_vec(),
            self.dispatcher.rasterizer(),
            self.dispatcher.config().thumbnail_scale,
        )
        .await;

        let out: Vec<Thumbnail<'_>> = items
            .iter()
            .map(|item| Thumbnail {
                id: item.id.as_str(),
                name: &item.file.name,
                thumbnail: &item.thumbnail,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        Ok(())
    }

    // -- Session steps --------------------------------------------------------

    fn select(&self, tool: ToolId, files: Vec<UploadFile>, mode: SelectMode) -> Result<ToolSession> {
        let validator = FileValidator::from_config(self.dispatcher.config(), mode);
        let mut session = ToolSession::new(tool, validator);
        debug!(session = %session.id(), ?tool, "session opened");
        session.select(files).map_err(|err| present(&humanize_error(&err)))?;
        Ok(session)
    }

    async fn execute(&self, mut session: ToolSession, operation: Operation) -> Result<()> {
        session.begin().map_err(|err| present(&humanize_error(&err)))?;
        session.advance(PROGRESS_STEP);

        let files = session.batch().files().to_vec();
        let dispatcher = self.dispatcher.clone();
        let task = operation.clone();
        let outcome = tokio::task::spawn_blocking(move || dispatcher.run(&task, &files))
            .await
            .context("operation task failed")?;

        match outcome {
            Ok(result) => session.complete(result),
            Err(err) => return Err(present(&session.fail(&err))),
        }
        let result = session
            .take_result()
            .context("operation finished without a result")?;

        let base = session.tool().descriptor().output_name;
        let written = output::write_result(&self.out_dir, base, &result).await?;
        print_paths(&written);
        Ok(())
    }
}

fn apply_move(arrangement: &mut Arrangement, step: Move) -> Result<()> {
    let id_at = |arrangement: &Arrangement, position: usize| {
        arrangement
            .items()
            .get(position - 1)
            .map(|item| item.id.clone())
            .ok_or_else(|| anyhow!("position {position} is out of range (1..={})", arrangement.len()))
    };

    match step {
        Move::Drag { from, to } => {
            let dragged = id_at(arrangement, from)?;
            let target = id_at(arrangement, to)?;
            arrangement.move_by_drag(&dragged, &target);
        }
        Move::Up(n) => {
            arrangement.move_up(n - 1);
        }
        Move::Down(n) => {
            arrangement.move_down(n - 1);
        }
        Move::Remove(n) => {
            let id = id_at(arrangement, n)?;
            arrangement.remove(&id);
        }
    }
    Ok(())
}

/// Turn a user-facing error into the error the binary prints.
fn present(human: &HumanError) -> anyhow::Error {
    anyhow!("{}\n{}", human.message, human.suggestion)
}

fn print_paths(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

async fn info_command(paths: &[PathBuf]) -> Result<()> {
    let files = input::load_files(paths).await?;
    let infos = files
        .iter()
        .map(DocumentInfo::inspect)
        .collect::<Result<Vec<_>, FolioError>>()
        .map_err(|err| present(&humanize_error(&err)))?;
    println!("{}", serde_json::to_string_pretty(&infos)?);
    Ok(())
}

fn list_tools(search: &str, category: Option<folio_core::tools::Category>) {
    let tools = if search.is_empty() && category.is_none() {
        all_tools().iter().collect()
    } else {
        search_tools(search, category)
    };
    for tool in tools {
        let status = if tool.implemented { "" } else { " (coming soon)" };
        println!("{:<18} {}{} - {}", tool.slug, tool.name, status, tool.short_description);
    }
}
