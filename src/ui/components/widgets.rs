//! Render helpers for the three screens.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::model::types::{MetricsSummary, ResultItem, SearchMethod, format_metric, format_score};
use crate::session::SessionStore;
use crate::ui::Alert;
use crate::ui::components::theme::ThemePalette;
use crate::ui::detail::DetailView;
use crate::ui::form::SearchForm;
use crate::ui::results::ResultsView;

/// Which part of the results screen receives keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultsFocus {
    Query,
    List,
}

pub const BRAND: &str = "AlphaQuery";

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn method_chips(selected: SearchMethod, palette: ThemePalette) -> Line<'static> {
    let mut spans = Vec::new();
    for method in SearchMethod::ALL {
        let style = if method == selected {
            palette.highlight_style()
        } else {
            Style::default().fg(palette.method_accent(method))
        };
        spans.push(Span::styled(format!(" {} ", method.label()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn search_bar(query: &str, focused: bool, title: String, palette: ThemePalette) -> Paragraph<'static> {
    let border = if focused {
        palette.border_focus_style()
    } else {
        palette.border_style()
    };
    let text = if query.is_empty() {
        Span::styled("Escribe tu búsqueda", palette.hint_style())
    } else {
        Span::styled(query.to_string(), Style::default().fg(palette.fg))
    };
    Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(title, palette.title())),
    )
}

/// Cursor cell after the last character of a bordered input, clamped inside the border.
fn input_cursor(area: Rect, query: &str) -> (u16, u16) {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(1).saturating_add(typed);
    (x.min(area.right().saturating_sub(2)), area.y.saturating_add(1))
}

pub fn render_home(frame: &mut Frame, area: Rect, form: &SearchForm, palette: ThemePalette) {
    let column = centered_rect(70, 60, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // brand
            Constraint::Length(3), // query
            Constraint::Length(1), // gap
            Constraint::Length(1), // methods
            Constraint::Length(1), // gap
            Constraint::Length(1), // hint
            Constraint::Min(0),
        ])
        .split(column);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(BRAND, palette.title()))).alignment(Alignment::Center),
        rows[0],
    );

    let title = if form.is_submitting() {
        "Buscando...".to_string()
    } else {
        "Buscar".to_string()
    };
    frame.render_widget(search_bar(&form.query, true, title, palette), rows[1]);
    frame.set_cursor_position(input_cursor(rows[1], &form.query));

    frame.render_widget(
        Paragraph::new(method_chips(form.method, palette)).alignment(Alignment::Center),
        rows[3],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(footer_legend(Screen::Home), palette.hint_style()))
            .alignment(Alignment::Center),
        rows[5],
    );
}

fn result_card(item: &ResultItem, palette: ThemePalette) -> ListItem<'static> {
    let title = if item.title.is_empty() {
        "(sin título)".to_string()
    } else {
        item.title.clone()
    };
    let header = Line::from(vec![
        Span::styled(
            format!("{:>6}", format_score(item.similarity)),
            Style::default().fg(palette.similarity_color(item.similarity)),
        ),
        Span::raw("  "),
        Span::styled(title, palette.title_subtle()),
    ]);
    let mut lines = vec![header];
    if !item.categories.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("        [{}]", item.categories),
            Style::default().fg(palette.accent_alt),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("        {}", item.preview().replace('\n', " ")),
        palette.body_style(),
    )));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

pub fn metrics_lines(metrics: &MetricsSummary, palette: ThemePalette) -> Vec<Line<'static>> {
    let row = |label: &str, value: Option<f64>| {
        let style = if value.is_some() {
            Style::default().fg(palette.fg)
        } else {
            palette.hint_style()
        };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), palette.title_subtle()),
            Span::styled(format_metric(value), style),
        ])
    };
    vec![
        row("Precision", metrics.precision),
        row("Recall", metrics.recall),
        row("F1", metrics.f1),
    ]
}

pub fn page_buttons(current: usize, count: usize, palette: ThemePalette) -> Line<'static> {
    let mut spans = Vec::new();
    for page in 1..=count {
        let style = if page == current {
            palette.highlight_style()
        } else {
            palette.hint_style()
        };
        spans.push(Span::styled(format!(" {page} "), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

pub fn render_results<S: SessionStore>(
    frame: &mut Frame,
    area: Rect,
    view: &ResultsView<S>,
    cursor: usize,
    focus: ResultsFocus,
    palette: ThemePalette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // search bar
            Constraint::Length(1), // category filter
            Constraint::Min(0),    // cards + metrics
            Constraint::Length(1), // page buttons
            Constraint::Length(1), // footer
        ])
        .split(area);

    let mut title = format!("{BRAND} · {}", view.method().label());
    if view.is_loading() {
        title.push_str(" · Buscando...");
    }
    frame.render_widget(
        search_bar(view.query(), focus == ResultsFocus::Query, title, palette),
        chunks[0],
    );
    if focus == ResultsFocus::Query {
        frame.set_cursor_position(input_cursor(chunks[0], view.query()));
    }

    let categories = view.categories();
    let selected = if view.selected_category().is_empty() {
        "Todas".to_string()
    } else {
        view.selected_category().to_string()
    };
    let filter_line = Line::from(vec![
        Span::styled("Categoría: ", palette.title_subtle()),
        Span::styled(selected, Style::default().fg(palette.accent_alt).add_modifier(Modifier::BOLD)),
        Span::styled(
            if categories.is_empty() {
                "  (sin categorías)".to_string()
            } else {
                format!("  [{}]", categories.join(" | "))
            },
            palette.hint_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(filter_line), chunks[1]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[2]);

    let list_border = if focus == ResultsFocus::List {
        palette.border_focus_style()
    } else {
        palette.border_style()
    };
    let list_title = format!(
        "Resultados para: \"{}\" ({})",
        view.query(),
        view.results().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(list_border)
        .title(Span::styled(list_title, palette.title()));

    if view.results().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("Sin resultados.", palette.hint_style())).block(block),
            main[0],
        );
    } else {
        let items: Vec<ListItem> = view
            .page_items()
            .iter()
            .map(|item| result_card(item, palette))
            .collect();
        let mut state = ListState::default();
        if focus == ResultsFocus::List {
            state.select(Some(cursor));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(palette.selected_style())
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, main[0], &mut state);
    }

    frame.render_widget(
        Paragraph::new(metrics_lines(view.metrics(), palette)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style())
                .title(Span::styled("Métricas", palette.title())),
        ),
        main[1],
    );

    frame.render_widget(
        Paragraph::new(page_buttons(view.page(), view.page_count(), palette)).alignment(Alignment::Center),
        chunks[3],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(footer_legend(Screen::Results), palette.hint_style())),
        chunks[4],
    );
}

pub fn render_detail(frame: &mut Frame, area: Rect, detail: &DetailView, scroll: u16, palette: ThemePalette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(rows[0]);

    let mut body = vec![
        Line::from(Span::styled(detail.title().to_string(), palette.title())),
        Line::from(vec![
            Span::styled("Categoría: ", palette.title_subtle()),
            Span::styled(detail.category_label().to_string(), palette.hint_style()),
        ]),
        Line::from(""),
    ];
    body.extend(
        detail
            .text()
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), palette.body_style()))),
    );
    frame.render_widget(
        Paragraph::new(body)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border_focus_style())
                    .title(Span::styled("← Volver (Esc)", palette.hint_style())),
            )
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        cols[0],
    );

    let method = detail.method();
    let metrics = vec![
        Line::from(vec![
            Span::styled("Método:    ", palette.title_subtle()),
            Span::styled(
                method.label().to_string(),
                Style::default().fg(palette.method_accent(method)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Similitud: ", palette.title_subtle()),
            Span::styled(
                detail.similarity_label(),
                Style::default().fg(palette.similarity_color(detail.item.similarity)),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(metrics).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style())
                .title(Span::styled("Detalle de métricas", palette.title())),
        ),
        cols[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(footer_legend(Screen::Detail), palette.hint_style())),
        rows[1],
    );
}

pub fn render_alert(frame: &mut Frame, alert: &Alert, palette: ThemePalette) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(alert.message.clone(), palette.alert_style())),
            Line::from(""),
            Line::from(Span::styled("Enter para continuar", palette.hint_style())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error)),
        ),
        area,
    );
}

/// Screen identity used by the footer legend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Results,
    Detail,
}

pub fn footer_legend(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "Enter buscar | ←/→ método | F5 última búsqueda | F2 tema | Esc salir",
        Screen::Results => {
            "Enter buscar/abrir | Tab foco | F3 método | F4 categoría | ←/→ página | F2 tema | Esc inicio"
        }
        Screen::Detail => "Esc volver | ↑/↓ desplazar | F2 tema | Ctrl-C salir",
    }
}
