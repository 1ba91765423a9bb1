//! Line-oriented rendering for the one-shot commands: colored text or `--json`.

use colored::Colorize;
use serde::Serialize;

use crate::model::types::{MetricsSummary, SearchMethod, format_metric, format_score};
use crate::session::{SearchSession, SessionStore};
use crate::ui::detail::DetailView;
use crate::ui::results::ResultsView;

#[derive(Debug, Serialize)]
pub struct CardJson {
    /// 1-based position in the filtered list, usable with `show`.
    pub index: usize,
    pub title: String,
    pub preview: String,
    pub similarity: f64,
    pub categories: String,
}

#[derive(Debug, Serialize)]
pub struct ResultsPageJson {
    pub query: String,
    pub method: SearchMethod,
    pub selected_category: String,
    pub categories: Vec<String>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub results: Vec<CardJson>,
    pub metrics: MetricsSummary,
}

impl ResultsPageJson {
    pub fn from_view<S: SessionStore>(view: &ResultsView<S>) -> Self {
        let offset = (view.page() - 1) * crate::ui::results::PAGE_SIZE;
        Self {
            query: view.query().to_string(),
            method: view.method(),
            selected_category: view.selected_category().to_string(),
            categories: view.categories(),
            page: view.page(),
            page_count: view.page_count(),
            total: view.results().len(),
            results: view
                .page_items()
                .iter()
                .enumerate()
                .map(|(i, item)| CardJson {
                    index: offset + i + 1,
                    title: item.title.clone(),
                    preview: item.preview(),
                    similarity: item.similarity,
                    categories: item.categories.clone(),
                })
                .collect(),
            metrics: *view.metrics(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailJson<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub text: &'a str,
    pub method: SearchMethod,
    pub similarity: f64,
}

impl<'a> From<&'a DetailView> for DetailJson<'a> {
    fn from(detail: &'a DetailView) -> Self {
        Self {
            title: detail.title(),
            category: detail.category_label(),
            text: detail.text(),
            method: detail.method(),
            similarity: detail.item.similarity,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_results<S: SessionStore>(view: &ResultsView<S>) {
    let page = ResultsPageJson::from_view(view);
    println!(
        "{} \"{}\" {}",
        "Resultados para:".bold(),
        page.query,
        format!("({})", page.method.label()).dimmed()
    );
    let filter = if page.selected_category.is_empty() {
        "Todas".to_string()
    } else {
        page.selected_category.clone()
    };
    println!(
        "{} {}  {}",
        "Categoría:".bold(),
        filter.magenta(),
        format!("[{}]", page.categories.join(" | ")).dimmed()
    );
    println!();

    if page.results.is_empty() {
        println!("{}", "Sin resultados.".dimmed());
    }
    for card in &page.results {
        println!(
            "{:>3}. {}  {}",
            card.index,
            card.title.bold(),
            format_score(card.similarity).green()
        );
        if !card.categories.is_empty() {
            println!("     {}", format!("[{}]", card.categories).magenta());
        }
        println!("     {}", card.preview.replace('\n', " "));
        println!();
    }

    print_metrics(&page.metrics);
    if page.page_count > 0 {
        println!(
            "{}",
            format!("Página {} de {} ({} resultados)", page.page, page.page_count, page.total).dimmed()
        );
    }
}

pub fn print_metrics(metrics: &MetricsSummary) {
    println!(
        "{}  precision {}  recall {}  f1 {}",
        "Métricas:".bold(),
        format_metric(metrics.precision),
        format_metric(metrics.recall),
        format_metric(metrics.f1)
    );
}

pub fn print_detail(detail: &DetailView) {
    println!("{}", detail.title().bold().blue());
    println!("{} {}", "Categoría:".bold(), detail.category_label());
    println!();
    println!("{}", detail.text());
    println!();
    println!("{} {}", "Método:".bold(), detail.method().label());
    println!("{} {}", "Similitud:".bold(), detail.similarity_label());
}

pub fn print_session(session: &SearchSession, saved_at: Option<String>) {
    println!("{} {}", "Consulta:".bold(), session.query);
    println!("{} {}", "Método:".bold(), session.method.label());
    println!("{} {}", "Resultados:".bold(), session.results.len());
    let category = if session.selected_category.is_empty() {
        "Todas"
    } else {
        session.selected_category.as_str()
    };
    println!("{} {}", "Categoría:".bold(), category);
    print_metrics(&session.metrics);
    if let Some(ts) = saved_at {
        println!("{}", format!("Guardada: {ts}").dimmed());
    }
}
