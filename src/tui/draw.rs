//! Rendering for the search, detail, and upload views.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::upload::UploadState;
use crate::app::{App, View};
use crate::encoding::repair_mojibake;
use crate::format::{
    format_date, format_score_badge, format_score_detail, truncate_chars, ScoreTier,
    DATE_NOT_INFORMED, NOT_INFORMED, OBJECT_EXCERPT_CHARS, WORK_PLAN_EXCERPT_CHARS,
};
use crate::models::{ParceriaDetail, ParceriaSummary};

use super::UiState;

const TITLE: &str = "HUB Aura — Conhecimento Dinâmico";

pub(super) fn draw(f: &mut Frame, app: &App, ui: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + view switch
            Constraint::Min(0),    // active view
            Constraint::Length(1), // key help
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    match app.view {
        View::Search => match &app.selected {
            Some(detail) => draw_detail(f, chunks[1], detail, ui),
            None => draw_search(f, chunks[1], app, ui),
        },
        View::Upload => draw_upload(f, chunks[1], app, ui),
    }
    draw_help(f, chunks[2], app, ui);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let (search_style, upload_style) = match app.view {
        View::Search => (active_tab(), inactive_tab()),
        View::Upload => (inactive_tab(), active_tab()),
    };
    let line = Line::from(vec![
        Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(" Buscar Acordos ", search_style),
        Span::raw(" "),
        Span::styled(" Adicionar Novo Acordo ", upload_style),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn active_tab() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn inactive_tab() -> Style {
    Style::default().fg(Color::Cyan)
}

fn draw_search(f: &mut Frame, area: Rect, app: &App, ui: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Length(1), // status message
            Constraint::Min(0),    // results
            Constraint::Length(1), // pagination
        ])
        .split(area);

    let toggle = if ui.semantic {
        "[x] Busca Semântica (IA)"
    } else {
        "[ ] Busca Semântica (IA)"
    };
    let input_title = if app.search.loading {
        "Buscando...".to_string()
    } else {
        format!("Buscar por termo, objeto ou parceiro  {}", toggle)
    };
    let input_style = if ui.results_focused {
        Style::default()
    } else {
        Style::default().fg(Color::Cyan)
    };
    f.render_widget(
        Paragraph::new(ui.input.as_str())
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title(input_title)),
        chunks[0],
    );

    if !app.search.loading {
        if let Some(message) = &app.search.message {
            f.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::DarkGray)),
                chunks[1],
            );
        }
    }

    let items: Vec<ListItem> = app.results.iter().map(result_row).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, chunks[2], &mut ui.list_state);

    if app.pagination_visible() && !app.search.loading {
        let footer = format!(
            "Página {} de {}  ({} itens)   ←/→ muda a página",
            app.search.page,
            app.total_pages(),
            app.search.total_items
        );
        f.render_widget(
            Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    }
}

/// One result row: organization, optional similarity badge, year plus a
/// 200-char object excerpt, and a work-plan excerpt when the record has one.
fn result_row(item: &ParceriaSummary) -> ListItem<'static> {
    let organization = item
        .organization
        .as_deref()
        .map(repair_mojibake)
        .unwrap_or_else(|| "Razão Social não informada".to_string());

    let mut title_spans = vec![Span::styled(
        organization,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(score) = item.similarity_score {
        let color = match ScoreTier::for_score(score) {
            ScoreTier::High => Color::Green,
            ScoreTier::Medium => Color::Yellow,
            ScoreTier::Neutral => Color::Gray,
        };
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            format!(" {} ", format_score_badge(score)),
            Style::default().fg(Color::Black).bg(color),
        ));
    }

    let year = item
        .term_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let object = item
        .object_description
        .as_deref()
        .map(|s| truncate_chars(&repair_mojibake(s), OBJECT_EXCERPT_CHARS))
        .unwrap_or_else(|| "Objeto não informado.".to_string());

    let mut lines = vec![
        Line::from(title_spans),
        Line::from(format!("Ano: {} — {}", year, object)),
    ];
    if let Some(plan) = item.work_plan.as_deref() {
        lines.push(Line::from(Span::styled(
            format!(
                "Plano: {} (Enter para ver completo)",
                truncate_chars(&repair_mojibake(plan), WORK_PLAN_EXCERPT_CHARS)
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn draw_detail(f: &mut Frame, area: Rect, detail: &ParceriaDetail, ui: &UiState) {
    let organization = detail
        .organization
        .as_deref()
        .map(repair_mojibake)
        .unwrap_or_else(|| "Detalhes da Parceria".to_string());
    let term = match (&detail.term_number, detail.term_year) {
        (Some(n), Some(y)) => format!("Termo Nº: {}/{}", n, y),
        (Some(n), None) => format!("Termo Nº: {}", n),
        (None, _) => "Termo Nº: N/A".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            organization,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(term, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled("Objeto do Acordo", section_style())),
        Line::from(
            detail
                .object_description
                .as_deref()
                .map(repair_mojibake)
                .unwrap_or_else(|| format!("{}.", NOT_INFORMED)),
        ),
        Line::from(""),
    ];

    if let Some(plan) = detail.work_plan.as_deref() {
        let plan = repair_mojibake(plan);
        lines.push(Line::from(Span::styled("Plano de Trabalho", section_style())));
        if ui.detail_expanded || plan.chars().count() <= OBJECT_EXCERPT_CHARS {
            lines.push(Line::from(plan.clone()));
        } else {
            lines.push(Line::from(truncate_chars(&plan, OBJECT_EXCERPT_CHARS)));
        }
        if plan.chars().count() > OBJECT_EXCERPT_CHARS {
            let label = if ui.detail_expanded {
                "[e] Mostrar menos"
            } else {
                "[e] Ler mais"
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(Color::Cyan),
            )));
        }
        lines.push(Line::from(""));
    }

    if let Some(score) = detail.similarity_score {
        lines.push(Line::from(format!(
            "Score de Similaridade: {}",
            format_score_detail(score)
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Detalhes Administrativos",
        section_style(),
    )));
    lines.push(field_line("CPF/CNPJ", detail.tax_id.as_deref(), NOT_INFORMED));
    lines.push(Line::from(format!(
        "Ano do Termo: {}",
        detail
            .term_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| NOT_INFORMED.to_string())
    )));
    lines.push(field_line("Situação", detail.status.as_deref(), DATE_NOT_INFORMED));
    lines.push(Line::from(format!(
        "Data de Assinatura: {}",
        format_date(detail.signature_date)
    )));
    lines.push(Line::from(format!(
        "Data de Publicação: {}",
        format_date(detail.publication_date)
    )));
    lines.push(Line::from(format!("Vigência: {}", format_date(detail.validity_date))));

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn field_line(label: &str, value: Option<&str>, placeholder: &str) -> Line<'static> {
    let value = value
        .map(repair_mojibake)
        .unwrap_or_else(|| placeholder.to_string());
    Line::from(format!("{}: {}", label, value))
}

fn section_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)
}

fn draw_upload(f: &mut Frame, area: Rect, app: &App, ui: &UiState) {
    let form = &app.upload;
    let mut lines = vec![Line::from(Span::styled(
        "Adicionar Novo Acordo via IA",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    lines.push(input_line("Arquivo PDF", &ui.upload_path, ui.upload_focus == 0));
    match form.state {
        UploadState::Extracting => lines.push(Line::from(Span::styled(
            "Processando com IA...",
            Style::default().fg(Color::Yellow),
        ))),
        UploadState::Saving => lines.push(Line::from(Span::styled(
            "Salvando...",
            Style::default().fg(Color::Yellow),
        ))),
        _ => {}
    }

    if let Some(message) = &form.message {
        let color = if form.state == UploadState::Saved {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(color),
        )));
    }

    if let Some(draft) = &form.draft {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Valide os Dados Extraídos",
            section_style(),
        )));
        lines.push(input_line("Razão Social do Parceiro", &draft.organization, ui.upload_focus == 1));
        lines.push(input_line("CNPJ", &draft.tax_id, ui.upload_focus == 2));
        lines.push(input_line("Ano do Termo", &draft.term_year, ui.upload_focus == 3));
        lines.push(input_line("Objeto do Acordo", &draft.object_description, ui.upload_focus == 4));
        lines.push(input_line("Plano de Trabalho", &draft.work_plan, ui.upload_focus == 5));
        lines.push(Line::from(Span::styled(
            "Campo opcional; enriquece a busca semântica do sistema.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{}{}: {}", marker, label, value), style))
}

fn draw_help(f: &mut Frame, area: Rect, app: &App, ui: &UiState) {
    let help = match app.view {
        View::Search if app.selected.is_some() => {
            "Esc volta para a busca   e expande/recolhe o plano   F2 alterna visão   Ctrl+C sai"
        }
        View::Search if ui.results_focused => {
            "↑/↓ navega   Enter abre detalhes   ←/→ muda página   Tab volta ao campo   Ctrl+C sai"
        }
        View::Search => "Enter busca   F3 alterna busca semântica   Tab foca resultados   F2 alterna visão   Ctrl+C sai",
        View::Upload => {
            "Enter no arquivo processa   Enter num campo salva   Tab/↑↓ navega   Esc volta   Ctrl+C sai"
        }
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
