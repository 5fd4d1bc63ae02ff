// src/sync/mod.rs
//! The sync orchestrator: query, filter, cache-check, render, status update,
//! cache persistence.
//!
//! Concurrency is a bounded pool: a semaphore admits up to `parallelism`
//! page pipelines at once. The first failure fails the run, but pages
//! already in flight are allowed to finish before the error surfaces; there
//! is no mid-flight cancellation of peers.

pub mod cache;

use crate::api::NotionRepository;
use crate::assets::{page_image_paths, AssetPipeline};
use crate::config::SyncConfig;
use crate::error::AppError;
use crate::formatting::front_matter;
use crate::formatting::{render_blocks, rich_text_to_markdown, FrontMatterValue, RenderContext};
use crate::model::{Block, Page};
use crate::output::paths::{article_filename, page_display_name};
use cache::{cache_timestamp, CacheEntry, SyncCache};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run-scoped inputs from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Keywords that must all appear in a page's title (case-insensitive).
    pub keywords: Vec<String>,
    /// Only process pages edited strictly after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Report what would be processed without writing anything.
    pub dry_run: bool,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub processed: usize,
    pub skipped_unchanged: usize,
    pub status_updated: usize,
}

/// Shared mutable state across page pipelines.
#[derive(Debug, Clone, Default)]
struct RunState {
    cache: SyncCache,
    status_updated: usize,
}

fn page_title(page: &Page) -> Option<String> {
    page.title_rich_text()
        .map(rich_text_to_markdown)
        .filter(|title| !title.is_empty())
}

/// Drives one full sync run.
pub async fn run(
    repo: Arc<dyn NotionRepository>,
    config: Arc<SyncConfig>,
    options: RunOptions,
) -> Result<SyncReport, AppError> {
    if !options.dry_run {
        fs::create_dir_all(&config.markdown.post_save_path)?;
    }

    let mut pages = repo.query_pages(&config.notion).await?;
    println!("✔ Querying Notion database: completed");

    let filter_active = !options.keywords.is_empty() || options.since.is_some();
    if filter_active {
        if !options.keywords.is_empty() {
            println!("Filtering pages by keywords: {:?}", options.keywords);
        }
        pages.retain(|page| page_matches(page, &options));
        println!("✔ Filtering completed: {} pages matched", pages.len());
    }

    if pages.is_empty() {
        println!("No pages found matching the criteria.");
        return Ok(SyncReport::default());
    }

    let cache = if config.incremental {
        SyncCache::load(config.cache_file())?
    } else {
        SyncCache::default()
    };

    let mut skipped_unchanged = 0usize;
    if config.incremental {
        pages.retain(|page| {
            if unchanged_in_cache(&cache, page, &config.markdown.post_save_path) {
                skipped_unchanged += 1;
                false
            } else {
                true
            }
        });
    }

    if options.dry_run {
        println!("\n-- Dry Run Active --");
        println!("Articles that would be processed:");
        for (index, page) in pages.iter().enumerate() {
            let title = page_title(page)
                .unwrap_or_else(|| format!("[Untitled Page: {}]", page.id.as_str()));
            println!(
                "  {}: {} (ID: {}, LastEdited: {})",
                index + 1,
                title,
                page.id.as_str(),
                page.last_edited_time.to_rfc3339()
            );
        }
        return Ok(SyncReport {
            skipped_unchanged,
            ..SyncReport::default()
        });
    }

    if config.incremental && skipped_unchanged > 0 {
        println!(
            "✔ Incremental sync: skipped {} unchanged pages",
            skipped_unchanged
        );
    }

    if pages.is_empty() {
        println!("No changed pages to process.");
        return Ok(SyncReport {
            skipped_unchanged,
            ..SyncReport::default()
        });
    }

    let total = pages.len();
    let state = Arc::new(Mutex::new(RunState {
        cache,
        status_updated: 0,
    }));
    let http = reqwest::Client::new();

    if config.parallelize && config.parallelism > 0 {
        let semaphore = Arc::new(Semaphore::new(config.parallelism));
        let mut tasks = JoinSet::new();

        for (index, page) in pages.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|_| AppError::Internal("worker admission closed".to_string()))?;
            let repo = Arc::clone(&repo);
            let config = Arc::clone(&config);
            let state = Arc::clone(&state);
            let http = http.clone();

            tasks.spawn(async move {
                let _permit = permit;
                process_page(repo.as_ref(), &http, &config, &state, index, total, page).await
            });
        }

        // Drain every task before surfacing the first error; in-flight
        // pages finish even when an earlier one failed.
        let mut first_error: Option<AppError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    if first_error.is_some() {
                        log::error!("{}", error);
                    } else {
                        first_error = Some(error);
                    }
                }
                Err(join_error) => {
                    let internal =
                        AppError::Internal(format!("page worker failed: {}", join_error));
                    if first_error.is_some() {
                        log::error!("{}", internal);
                    } else {
                        first_error = Some(internal);
                    }
                }
            }
        }
        if let Some(error) = first_error {
            return Err(error);
        }
    } else {
        for (index, page) in pages.into_iter().enumerate() {
            process_page(repo.as_ref(), &http, &config, &state, index, total, page).await?;
        }
    }

    let state = match Arc::try_unwrap(state) {
        Ok(mutex) => mutex.into_inner(),
        Err(shared) => shared.lock().clone(),
    };

    if config.incremental {
        state.cache.save(config.cache_file())?;
        println!("✔ Cache updated: {}", config.cache_file());
    }

    println!(
        "✔ Sync complete: processed={}, skipped={}, status-updated={}",
        total, skipped_unchanged, state.status_updated
    );

    Ok(SyncReport {
        processed: total,
        skipped_unchanged,
        status_updated: state.status_updated,
    })
}

fn page_matches(page: &Page, options: &RunOptions) -> bool {
    if let Some(since) = options.since {
        if page.last_edited_time <= since {
            return false;
        }
    }
    if !options.keywords.is_empty() {
        // Pages without a title never match keyword filters.
        let Some(title) = page_title(page) else {
            return false;
        };
        let lowered = title.to_lowercase();
        if !options
            .keywords
            .iter()
            .all(|keyword| lowered.contains(&keyword.to_lowercase()))
        {
            return false;
        }
    }
    true
}

/// A page is unchanged only when its cache entry carries the identical
/// timestamp string and the previously recorded output file still exists.
fn unchanged_in_cache(cache: &SyncCache, page: &Page, post_save_path: &str) -> bool {
    let Some(entry) = cache.pages.get(page.id.as_str()) else {
        return false;
    };
    if entry.last_edited != cache_timestamp(&page.last_edited_time) {
        return false;
    }
    Path::new(post_save_path).join(&entry.output_path).exists()
}

/// One page's pipeline: fetch blocks, generate the article, update status,
/// record the cache entry.
async fn process_page(
    repo: &dyn NotionRepository,
    http: &reqwest::Client,
    config: &SyncConfig,
    state: &Mutex<RunState>,
    index: usize,
    total: usize,
    page: Page,
) -> Result<(), AppError> {
    let title = page_title(&page);
    let display = page_display_name(index, title.as_deref(), &page.id);
    println!("[{:<30}] -- article [{}/{}] --", display, index + 1, total);

    let blocks = repo.block_tree(&page.id).await?;
    println!("[{:<30}] ✔ getting blocks tree: completed", display);

    let file_title = title.unwrap_or_else(|| page.id.as_str().to_string());
    let output_rel = article_filename(
        &file_title,
        &page.created_time,
        config.markdown.group_by_month,
    );
    let output_abs = Path::new(&config.markdown.post_save_path).join(&output_rel);
    let output_rel = output_rel.to_string_lossy().replace('\\', "/");

    let previous_output = if config.incremental {
        state
            .lock()
            .cache
            .pages
            .get(page.id.as_str())
            .map(|entry| entry.output_path.clone())
    } else {
        None
    };

    let page_name = format!("{}{}", config.markdown.page_name_prefix, file_title);
    generate_page(http, &page, blocks, config, &output_abs, &page_name).await?;
    println!("[{:<30}] ✔ generating blog post: completed", display);

    // A changed title means a changed path; drop the stale article now that
    // the replacement exists.
    if let Some(previous) = previous_output {
        if previous != output_rel {
            let stale = Path::new(&config.markdown.post_save_path).join(&previous);
            if stale.exists() {
                let _ = fs::remove_file(stale);
            }
        }
    }

    let status_updated = match repo.update_status(&page, &config.notion).await {
        Ok(changed) => changed,
        Err(error) => {
            log::warn!("[{}] status update failed: {}", display, error);
            false
        }
    };

    let mut state = state.lock();
    state.cache.pages.insert(
        page.id.as_str().to_string(),
        CacheEntry {
            last_edited: cache_timestamp(&page.last_edited_time),
            output_path: output_rel,
        },
    );
    if status_updated {
        state.status_updated += 1;
    }
    Ok(())
}

/// Renders one page to its output file: localize assets, build front
/// matter, render blocks, apply the optional content template, write.
async fn generate_page(
    http: &reqwest::Client,
    page: &Page,
    mut blocks: Vec<Block>,
    config: &SyncConfig,
    output_abs: &Path,
    page_name: &str,
) -> Result<(), AppError> {
    let shortcode = config.markdown.shortcode_target();
    let (save_dir, visit_prefix) = page_image_paths(
        &config.markdown.image_save_path,
        &config.markdown.image_public_link,
        page_name,
    );
    let mut ctx = RenderContext::new(shortcode).with_image_paths(save_dir, visit_prefix);

    let assets = AssetPipeline::new(
        http,
        ctx.image_save_path.clone(),
        ctx.image_visit_path.clone(),
    );
    assets
        .localize_tree(&mut blocks, shortcode.is_enabled())
        .await?;

    if let Some(cover) = &page.cover {
        let mut cover = cover.clone();
        assets.localize_file(&mut cover).await?;
        ctx.front_matter.insert(
            "cover".to_string(),
            FrontMatterValue::String(cover.url().to_string()),
        );
    }
    for (key, value) in front_matter::build(page) {
        ctx.front_matter.insert(key, value);
    }
    let header = front_matter::to_yaml(&ctx.front_matter)?;

    render_blocks(&mut ctx, &blocks, 0)?;

    let body = match &config.markdown.template {
        Some(template_path) => render_content_template(template_path, &ctx)?,
        None => ctx.buffer.clone(),
    };

    if let Some(parent) = output_abs.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_abs, format!("{}{}", header, body))?;
    Ok(())
}

/// Runs the rendered body through a user-supplied Handlebars template. The
/// template sees the front matter map and the rendered content; the fenced
/// front matter block itself is emitted ahead of the template output.
fn render_content_template(
    template_path: &Path,
    ctx: &RenderContext,
) -> Result<String, AppError> {
    let source =
        fs::read_to_string(template_path).map_err(|source| AppError::TemplateNotFound {
            path: template_path.display().to_string(),
            source,
        })?;

    let mut registry = handlebars::Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    let data = serde_json::json!({
        "front_matter": ctx.front_matter,
        "content": ctx.buffer,
    });
    registry
        .render_template(&source, &data)
        .map_err(|error| AppError::TemplateRender {
            name: template_path.display().to_string(),
            message: error.to_string(),
        })
}
