use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use form990_explorer::render::{dollars, dollars_cents, dollars_opt, percent_opt};
use form990_explorer::{
    filer_names, summary_table, DatasetCache, FilerReport, RankedEntry, YearlySummary,
    DEFAULT_FILER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Filers,
    Overview,
    Grants,
    Contractors,
    Compensation,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Filers => Page::Overview,
            Page::Overview => Page::Grants,
            Page::Grants => Page::Contractors,
            Page::Contractors => Page::Compensation,
            Page::Compensation => Page::Filers,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Filers => Page::Compensation,
            Page::Overview => Page::Filers,
            Page::Grants => Page::Overview,
            Page::Contractors => Page::Grants,
            Page::Compensation => Page::Contractors,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Filers => "Filers",
            Page::Overview => "Overview",
            Page::Grants => "Schedule I",
            Page::Contractors => "Part VII-B",
            Page::Compensation => "Schedule J",
        }
    }
}

pub struct App {
    pub cache: DatasetCache,
    pub summary: Vec<YearlySummary>,
    pub filers: Vec<String>,
    pub report: FilerReport,
    pub current_page: Page,
    pub filer_state: TableState,
    pub row_state: TableState,
    pub show_percent: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(cache: DatasetCache) -> Result<Self> {
        let summary = summary_table(cache.dataset());
        let filers = filer_names(&summary);
        if filers.is_empty() {
            anyhow::bail!("no filers in the data");
        }

        let selected_index = filers
            .iter()
            .position(|n| n == DEFAULT_FILER)
            .unwrap_or(0);
        let report = FilerReport::build(cache.dataset(), &summary, &filers[selected_index]);

        let mut filer_state = TableState::default();
        filer_state.select(Some(selected_index));
        let mut row_state = TableState::default();
        row_state.select(Some(0));

        Ok(Self {
            cache,
            summary,
            filers,
            report,
            current_page: Page::Overview,
            filer_state,
            row_state,
            show_percent: false,
            status: None,
        })
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.row_state.select(Some(0));
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.row_state.select(Some(0));
    }

    fn active_row_count(&self) -> usize {
        match self.current_page {
            Page::Filers => self.filers.len(),
            Page::Overview => self.report.yearly.len(),
            Page::Grants => self.report.grants_by_year.len(),
            Page::Contractors => self.report.contractors_by_year.len(),
            Page::Compensation => self.report.compensation_by_year.len(),
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Filers => &mut self.filer_state,
            _ => &mut self.row_state,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.active_row_count();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.active_row_count();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Rebuild the report for the filer highlighted on the Filers page.
    pub fn select_filer(&mut self) {
        if let Some(i) = self.filer_state.selected() {
            if let Some(name) = self.filers.get(i) {
                self.report = FilerReport::build(self.cache.dataset(), &self.summary, name);
                self.current_page = Page::Overview;
                self.row_state.select(Some(0));
            }
        }
    }

    pub fn toggle_percent(&mut self) {
        self.show_percent = !self.show_percent;
    }

    /// Explicit invalidation: re-read the source files and rebuild every
    /// derived table, keeping the current filer when it still exists.
    pub fn reload(&mut self) {
        let current = self.report.filing_org.clone();
        match self.cache.reload() {
            Ok(()) => {
                self.summary = summary_table(self.cache.dataset());
                self.filers = filer_names(&self.summary);
                let index = self.filers.iter().position(|n| *n == current).unwrap_or(0);
                self.filer_state.select(Some(index));
                if let Some(name) = self.filers.get(index) {
                    self.report = FilerReport::build(self.cache.dataset(), &self.summary, name);
                }
                self.status = Some(format!(
                    "Reloaded {} rows",
                    self.cache.dataset().row_count()
                ));
            }
            Err(e) => {
                self.status = Some(format!("Reload failed: {e}"));
            }
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Enter if app.current_page == Page::Filers => app.select_filer(),
                KeyCode::Char('f') => app.current_page = Page::Filers,
                KeyCode::Char('p') => app.toggle_percent(),
                KeyCode::Char('r') => app.reload(),
                KeyCode::Down | KeyCode::Char('j') => app.next_row(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Filers => render_filers(f, chunks[1], app),
        Page::Overview => render_overview(f, chunks[1], app),
        Page::Grants => render_grants(f, chunks[1], app),
        Page::Contractors => render_contractors(f, chunks[1], app),
        Page::Compensation => render_compensation(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [
        Page::Filers,
        Page::Overview,
        Page::Grants,
        Page::Contractors,
        Page::Compensation,
    ];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    let years = match &app.report.year_range {
        Some((first, last)) => format!("{first}-{last}"),
        None => "no filings".to_string(),
    };
    tab_spans.push(Span::styled(
        format!("{} ({years})", app.report.filing_org),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).title("990 Data Explorer"));
    f.render_widget(header, area);
}

fn render_filers(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .filers
        .iter()
        .map(|name| Row::new(vec![Cell::from(name.as_str())]))
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(100)])
        .header(Row::new(vec!["Filing Organization"]).style(Style::default().fg(Color::Cyan)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select a Filer (Enter)"),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, &mut app.filer_state);
}

fn bar_data(entries: &[RankedEntry]) -> Vec<(String, u64)> {
    entries
        .iter()
        .map(|e| {
            let label: String = e.name.chars().take(12).collect();
            (label, e.amount.max(0.0) as u64)
        })
        .collect()
}

fn render_bar_chart(f: &mut Frame, area: Rect, title: &str, entries: &[RankedEntry]) {
    let data = bar_data(entries);
    let data_refs: Vec<(&str, u64)> = data.iter().map(|(l, v)| (l.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(&data_refs)
        .bar_width(13)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));

    f.render_widget(chart, area);
}

fn render_overview(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_bar_chart(
        f,
        chunks[0],
        "Total Expenses by Category (all years)",
        app.report.top_categories(),
    );

    if app.show_percent {
        let rows: Vec<Row> = app
            .report
            .percentages
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.tax_year.clone()),
                    Cell::from(percent_opt(p.grants_pct)),
                    Cell::from(percent_opt(p.contractor_pct)),
                    Cell::from(percent_opt(p.total_compensation_pct)),
                    Cell::from(percent_opt(p.compensation_filing_org_pct)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(20),
                Constraint::Length(20),
            ],
        )
        .header(
            Row::new(vec![
                "Tax Year",
                "Grants %",
                "Contractors %",
                "Comp (w/ related) %",
                "Comp (filing org) %",
            ])
            .style(Style::default().fg(Color::Cyan)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Share of Total Expenses ('p' for $)"),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

        f.render_stateful_widget(table, chunks[1], &mut app.row_state);
    } else {
        let rows: Vec<Row> = app
            .report
            .yearly
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.tax_year.clone()),
                    Cell::from(dollars(r.total_expenses)),
                    Cell::from(dollars_opt(r.grants_given)),
                    Cell::from(dollars_opt(r.contractor_expenses)),
                    Cell::from(dollars_opt(r.total_compensation)),
                    Cell::from(dollars_opt(r.compensation_filing_org)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(18),
                Constraint::Length(18),
            ],
        )
        .header(
            Row::new(vec![
                "Tax Year",
                "Expenses",
                "Grants",
                "Contractors",
                "Comp (w/ related)",
                "Comp (filing org)",
            ])
            .style(Style::default().fg(Color::Cyan)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Total Expenses by Year ('p' for %)"),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

        f.render_stateful_widget(table, chunks[1], &mut app.row_state);
    }
}

fn render_grants(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Min(0),
        ])
        .split(area);

    let average = match app.report.grants_yearly_average {
        Some(avg) => dollars_cents(avg),
        None => "n/a".to_string(),
    };
    let scalars = Paragraph::new(vec![
        Line::from(format!(
            "Total grants given: {}",
            dollars_cents(app.report.grants_aggregate)
        )),
        Line::from(format!("Yearly average: {average}")),
    ])
    .block(Block::default().borders(Borders::ALL).title("Grants Awarded"));
    f.render_widget(scalars, chunks[0]);

    render_bar_chart(
        f,
        chunks[1],
        "Top 10 Grant Amounts by Grantee",
        app.report.top_grantees(),
    );

    render_by_year_table(
        f,
        chunks[2],
        "Grants Awarded by Year",
        "Grantee",
        &app.report.grants_by_year,
        &mut app.row_state,
    );
}

fn render_contractors(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Min(0)])
        .split(area);

    render_bar_chart(
        f,
        chunks[0],
        "Top 10 Contractor Amounts by Contractor",
        app.report.top_contractors(),
    );

    render_by_year_table(
        f,
        chunks[1],
        "Independent Contractors by Year",
        "Contractor",
        &app.report.contractors_by_year,
        &mut app.row_state,
    );
}

fn render_by_year_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    name_header: &str,
    entries: &[form990_explorer::YearEntry],
    state: &mut TableState,
) {
    let rows: Vec<Row> = entries
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.tax_year.clone()),
                Cell::from(e.name.clone()),
                Cell::from(dollars(e.amount)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Percentage(60),
            Constraint::Length(16),
        ],
    )
    .header(
        Row::new(vec!["Tax Year", name_header, "Amount"]).style(Style::default().fg(Color::Cyan)),
    )
    .block(Block::default().borders(Borders::ALL).title(title.to_string()))
    .highlight_style(Style::default().bg(Color::DarkGray));

    f.render_stateful_widget(table, area, state);
}

fn render_compensation(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(0)])
        .split(area);

    let latest_title = match app.report.compensation_latest.first() {
        Some(entry) => format!("Highest Paid Employees, {}", entry.tax_year),
        None => "Highest Paid Employees".to_string(),
    };
    let latest_rows: Vec<Row> = app
        .report
        .compensation_latest
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.name.clone()),
                Cell::from(e.title.clone()),
                Cell::from(dollars(e.total_compensation)),
                Cell::from(dollars(e.compensation_filing_org)),
            ])
        })
        .collect();

    let latest = Table::new(
        latest_rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Length(18),
            Constraint::Length(18),
        ],
    )
    .header(
        Row::new(vec!["Name", "Title", "Total Comp", "Filing Org Comp"])
            .style(Style::default().fg(Color::Cyan)),
    )
    .block(Block::default().borders(Borders::ALL).title(latest_title));
    f.render_widget(latest, chunks[0]);

    let by_year_rows: Vec<Row> = app
        .report
        .compensation_by_year
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.tax_year.clone()),
                Cell::from(e.name.clone()),
                Cell::from(e.title.clone()),
                Cell::from(dollars(e.total_compensation)),
                Cell::from(dollars(e.compensation_filing_org)),
            ])
        })
        .collect();

    let by_year = Table::new(
        by_year_rows,
        [
            Constraint::Length(12),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Length(18),
            Constraint::Length(18),
        ],
    )
    .header(
        Row::new(vec!["Tax Year", "Name", "Title", "Total Comp", "Filing Org Comp"])
            .style(Style::default().fg(Color::Cyan)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Compensation by Employee and Year"),
    )
    .highlight_style(Style::default().bg(Color::DarkGray));

    f.render_stateful_widget(by_year, chunks[1], &mut app.row_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let hints = "Tab: pages | f: filers | Enter: select | ↑↓: move | p: $/% | r: reload | q: quit";
    let text = match &app.status {
        Some(status) => format!("{hints}  |  {status}"),
        None => hints.to_string(),
    };

    let bar = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle_is_closed() {
        let mut page = Page::Filers;
        for _ in 0..5 {
            page = page.next();
        }
        assert_eq!(page, Page::Filers);

        for _ in 0..5 {
            page = page.previous();
        }
        assert_eq!(page, Page::Filers);
    }

    #[test]
    fn test_bar_data_truncates_labels() {
        let entries = vec![RankedEntry {
            name: "A VERY LONG ORGANIZATION NAME".to_string(),
            amount: 1234.56,
        }];
        let data = bar_data(&entries);
        assert_eq!(data[0].0.chars().count(), 12);
        assert_eq!(data[0].1, 1234);
    }
}
