use crate::ai::TreeArtifact;
use crate::game::{Board, Cell, MatchState, MatchStatus, Player, COLS, ROWS};
use crate::session::AiSettings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HUMAN_COLOR: Color = Color::Red;
const AI_COLOR: Color = Color::Yellow;

pub fn render(
    frame: &mut Frame,
    state: &MatchState,
    settings: &AiSettings,
    selected_column: usize,
    message: &Option<String>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(15),   // Board + match panel
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(38)])
        .split(chunks[1]);

    render_header(frame, state, settings, chunks[0]);
    render_board(frame, state, selected_column, body[0]);
    render_panel(frame, state, body[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, state: &MatchState, settings: &AiSettings, area: Rect) {
    let (status, color) = match state.status() {
        MatchStatus::NotStarted => ("Not started".to_string(), Color::Gray),
        MatchStatus::Finished => ("Match over".to_string(), Color::Green),
        MatchStatus::InProgress if state.current_player() == Player::Human => {
            ("Your turn".to_string(), HUMAN_COLOR)
        }
        MatchStatus::InProgress => ("AI is thinking...".to_string(), AI_COLOR),
    };

    let header = Paragraph::new(format!(
        "{}  |  AI: {} depth {}",
        status, settings.algorithm, settings.depth
    ))
    .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn cell_span(cell: Cell) -> Span<'static> {
    let (symbol, color) = match cell {
        Cell::Empty => (" . ", Color::DarkGray),
        Cell::Human => (" ● ", HUMAN_COLOR),
        Cell::Ai => (" ● ", AI_COLOR),
    };
    Span::styled(symbol, Style::default().fg(color))
}

fn render_board(frame: &mut Frame, state: &MatchState, selected_column: usize, area: Rect) {
    let board: &Board = state.board();
    let last = state.last_move();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        let label = format!(" {} ", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else if !board.is_playable(col) {
            col_line.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔═════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..COLS {
            let mut span = cell_span(board.get(row, col));
            if last.is_some_and(|m| m.row == row && m.column == col) {
                span.style = span.style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            row_spans.push(span);
        }
        row_spans.push(Span::raw("║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚═════════════════════╝"));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_panel(frame: &mut Frame, state: &MatchState, area: Rect) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("You ", Style::default().fg(HUMAN_COLOR).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{}   ", state.scores().human)),
            Span::styled("AI ", Style::default().fg(AI_COLOR).add_modifier(Modifier::BOLD)),
            Span::raw(state.scores().ai.to_string()),
        ]),
    ];
    if let Some(winner) = state.winner() {
        lines.push(Line::styled(
            winner.to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(""));

    if let Some(last) = state.last_move() {
        lines.push(Line::from(format!(
            "Last move: {} in column {}",
            last.player.name(),
            last.column + 1
        )));
    }

    if let Some(stats) = state.ai_stats() {
        lines.push(Line::from("AI search:"));
        if let Some(nodes) = stats.nodes_expanded {
            lines.push(Line::from(format!("  nodes expanded {nodes}")));
        }
        if let Some(seconds) = stats.elapsed_seconds {
            lines.push(Line::from(format!("  time {:.3}s", seconds)));
        }
        if let Some(evaluation) = stats.evaluation {
            lines.push(Line::from(format!("  evaluation {:.2}", evaluation)));
        }
    }

    match state.decision_tree() {
        TreeArtifact::Absent => {}
        TreeArtifact::Malformed(err) => {
            lines.push(Line::styled(
                format!("Tree unavailable: {err}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        TreeArtifact::Tree(tree) => {
            let summary = tree.summary();
            lines.push(Line::from(format!(
                "Tree: {} nodes, {} leaves",
                summary.nodes, summary.leaves
            )));
            lines.push(Line::from(format!(
                "      depth {}, {} pruned",
                summary.max_depth, summary.pruned
            )));
        }
    }

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Match"));
    frame.render_widget(panel, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  S: Start  |  N: New match  |  Q: Quit");
    let line2 = Line::from("A: Algorithm  |  +/-: Depth  |  H: Service health  |  E: Export tree");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
