//! Crawl coordination
//!
//! The coordinator turns the configured targets into seed fetches, fans
//! page fetches out across a bounded task pool, and feeds every fetched
//! page's links back through the frontier. It owns the only mutable
//! crawl state outside the frontier: the pending queue, the in-flight
//! task set, and the product sink.

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::fetch::{build_http_client, fetch_static, FetchDirective, FetchOutcome, RenderSession};
use crate::frontier::Frontier;
use crate::output::{JsonExportSink, ProductSink};
use crate::scope::ScopeGuard;
use crate::url::registered_domain_of_url;
use crate::{ScoutError, UrlClassifier};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use url::Url;

/// What one fetch task brings back to the coordinator
struct PageResult {
    /// URL the page was requested as
    requested: Url,

    /// URL after redirects, used as the base for resolving links
    final_url: Url,

    title: Option<String>,
    hrefs: Vec<String>,
}

/// Main crawl orchestrator
pub struct Coordinator {
    config: Arc<Config>,
    frontier: Frontier,
    client: reqwest::Client,
    sink: Box<dyn ProductSink>,
}

impl Coordinator {
    /// Creates a coordinator from validated configuration
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let classifier = UrlClassifier::with_defaults()?;
        let scope = ScopeGuard::new(&config);
        let frontier = Frontier::new(classifier, scope, config.render.clone());

        let client = build_http_client(Duration::from_secs(config.crawler.fetch_timeout_secs))?;
        let sink = Box::new(JsonExportSink::new(&config.output.output_dir));

        Ok(Self {
            config: Arc::new(config),
            frontier,
            client,
            sink,
        })
    }

    /// Runs the crawl to completion
    ///
    /// Completion means the pending queue is empty and every in-flight
    /// fetch has returned, or the page budget is exhausted. The product
    /// sink is flushed on the way out either way.
    pub async fn run(&mut self) -> Result<(), ScoutError> {
        let start = Instant::now();

        let render = self.launch_render_session().await?;

        let mut queue: VecDeque<FetchDirective> = VecDeque::new();
        for seed in self.seed_urls() {
            if let Some(directive) = self.frontier.admit_seed(&seed) {
                queue.push_back(directive);
            }
        }
        if queue.is_empty() {
            warn!("no seeds admitted, nothing to crawl");
            return self.finish(start, render).await;
        }
        info!(seeds = queue.len(), "crawl starting");

        let global_limit = Arc::new(Semaphore::new(
            self.config.crawler.max_concurrent_requests as usize,
        ));
        let mut domain_limits: HashMap<String, Arc<Semaphore>> = HashMap::new();
        let delay = Duration::from_millis(self.config.crawler.download_delay_ms);
        let max_pages = self.config.crawler.max_pages;

        let mut tasks: JoinSet<Result<Option<PageResult>, ScoutError>> = JoinSet::new();
        let mut pages_scheduled: u64 = 0;

        loop {
            while let Some(directive) = queue.pop_front() {
                if max_pages > 0 && pages_scheduled >= max_pages {
                    debug!(max_pages, "page budget reached, dropping remaining queue");
                    queue.clear();
                    break;
                }
                pages_scheduled += 1;

                let domain_limit = self.domain_limit(&mut domain_limits, directive.url());
                let global_limit = Arc::clone(&global_limit);
                let client = self.client.clone();
                let render = render.clone();

                tasks.spawn(async move {
                    let _global = global_limit.acquire_owned().await;
                    let _domain = match &domain_limit {
                        Some(limit) => Some(Arc::clone(limit).acquire_owned().await),
                        None => None,
                    };

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }

                    fetch_page(client, render, directive).await
                });
            }

            let joined = match tasks.join_next().await {
                Some(joined) => joined,
                None => break,
            };

            match joined {
                Ok(Ok(Some(page))) => self.process_page(page, &mut queue)?,
                Ok(Ok(None)) => {}
                Ok(Err(e)) => error!(error = %e, "page fetch failed"),
                Err(e) => error!(error = %e, "fetch task panicked"),
            }
        }

        info!(
            pages = pages_scheduled,
            visited = self.frontier.visited_count(),
            products = self.frontier.product_count(),
            elapsed_secs = start.elapsed().as_secs(),
            "crawl finished"
        );

        self.finish(start, render).await
    }

    /// Feeds a fetched page's links through the frontier
    fn process_page(
        &mut self,
        page: PageResult,
        queue: &mut VecDeque<FetchDirective>,
    ) -> Result<(), ScoutError> {
        debug!(
            url = %page.requested,
            title = page.title.as_deref().unwrap_or(""),
            links = page.hrefs.len(),
            "page fetched"
        );

        let batch = self.frontier.process_links(&page.final_url, &page.hrefs);

        for record in batch.products {
            self.sink.record(record)?;
        }
        queue.extend(batch.follow);

        Ok(())
    }

    async fn finish(
        &mut self,
        start: Instant,
        render: Option<Arc<RenderSession>>,
    ) -> Result<(), ScoutError> {
        if let Some(session) = render {
            if let Ok(session) = Arc::try_unwrap(session) {
                session.close().await;
            }
        }

        self.sink.flush()?;
        info!(
            products = self.sink.len(),
            elapsed_secs = start.elapsed().as_secs(),
            "product export complete"
        );
        Ok(())
    }

    /// One seed per configured target, at the domain root over HTTPS
    fn seed_urls(&self) -> Vec<Url> {
        self.frontier
            .scope()
            .targets()
            .filter_map(|target| {
                let raw = if target.domain.contains(':') {
                    // Host:port targets are local test servers, plain HTTP
                    format!("http://{}/", target.domain)
                } else {
                    format!("https://{}/", target.domain)
                };
                match Url::parse(&raw) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(domain = %target.domain, error = %e, "skipping unparseable seed");
                        None
                    }
                }
            })
            .collect()
    }

    fn domain_limit(
        &self,
        limits: &mut HashMap<String, Arc<Semaphore>>,
        url: &Url,
    ) -> Option<Arc<Semaphore>> {
        let domain = registered_domain_of_url(url)?;
        let per_domain = self.config.crawler.max_domain_concurrency as usize;
        Some(Arc::clone(limits.entry(domain).or_insert_with(|| {
            Arc::new(Semaphore::new(per_domain))
        })))
    }

    /// Starts the headless browser only if some target needs it
    async fn launch_render_session(&self) -> Result<Option<Arc<RenderSession>>, ScoutError> {
        let needs_render = self
            .frontier
            .scope()
            .targets()
            .any(|target| target.requires_rendering);
        if !needs_render {
            return Ok(None);
        }

        let session = RenderSession::launch(&self.config.render).await?;
        Ok(Some(Arc::new(session)))
    }
}

/// Fetches one page via its directive's path
///
/// Returns `Ok(None)` for pages that came back but are not worth
/// parsing (HTTP errors, non-HTML responses); those end the URL, not
/// the crawl. Transport and render errors surface as `Err` so the
/// coordinator can log them distinctly.
async fn fetch_page(
    client: reqwest::Client,
    render: Option<Arc<RenderSession>>,
    directive: FetchDirective,
) -> Result<Option<PageResult>, ScoutError> {
    let requested = directive.url().clone();

    match directive {
        FetchDirective::Static { url } => match fetch_static(&client, &url).await {
            FetchOutcome::Success { final_url, body } => {
                let final_url = Url::parse(&final_url).unwrap_or_else(|_| url.clone());
                let parsed = parse_html(&body);
                Ok(Some(PageResult {
                    requested,
                    final_url,
                    title: parsed.title,
                    hrefs: parsed.hrefs,
                }))
            }
            FetchOutcome::HttpError { status_code } => {
                debug!(url = %url, status = status_code, "page skipped");
                Ok(None)
            }
            FetchOutcome::ContentMismatch { content_type } => {
                debug!(url = %url, content_type = %content_type, "page skipped");
                Ok(None)
            }
            FetchOutcome::NetworkError { error } => {
                warn!(url = %url, error = %error, "page unreachable");
                Ok(None)
            }
        },
        FetchDirective::Render {
            url,
            resource_filter,
            scroll,
        } => {
            let session = render.ok_or_else(|| {
                ScoutError::Browser("render directive without a browser session".to_string())
            })?;
            let body = session.fetch(&url, &resource_filter, &scroll).await?;
            let parsed = parse_html(&body);
            Ok(Some(PageResult {
                requested,
                final_url: url,
                title: parsed.title,
                hrefs: parsed.hrefs,
            }))
        }
    }
}
