use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, FlashLevel, InputMode};
use crate::content::markup;
use crate::editor::{Editor, EditorField};
use crate::models::{Article, Category, Origin};
use crate::session::ViewState;

pub fn draw(frame: &mut Frame, app: &App) {
    // Sidebar 1/4, main pane 3/4
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4), Constraint::Ratio(3, 4)])
        .split(frame.area());

    render_sidebar(frame, app, main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Site title + caption
            Constraint::Length(3), // Category tabs
            Constraint::Length(2), // Category header
            Constraint::Min(0),    // List or detail
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[1]);

    render_header(frame, app, right_chunks[0]);
    render_tabs(frame, app, right_chunks[1]);
    render_category_header(frame, app.active, right_chunks[2]);
    match app.view() {
        ViewState::List => render_article_list(frame, app, right_chunks[3]),
        ViewState::Detail(_) => render_article_detail(frame, app, right_chunks[3]),
    }
    render_status(frame, app, right_chunks[4]);

    if let Some(editor) = &app.editor {
        render_editor(frame, editor);
    }

    if app.mode == InputMode::Login {
        render_login(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "About this site",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(app.site.about.as_str()),
        Line::from(""),
    ];

    if !app.site.links.is_empty() {
        lines.push(Line::from(Span::styled(
            "Links",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for link in &app.site.links {
            lines.push(Line::from(vec![
                Span::raw("🔗 "),
                Span::styled(link.label.as_str(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", link.url),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Contents",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for category in Category::ALL {
        let style = if category == app.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("  {} ({})", category.label(), app.count(category)),
            style,
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" 🗨️ {} ", app.site.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(app.site.caption.as_str())
        .block(block)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .map(|c| Line::from(format!(" {} ", c.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.active.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_category_header(frame: &mut Frame, category: Category, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            category.label(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            category.description(),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn origin_badge(article: &Article) -> Span<'static> {
    match article.origin() {
        Origin::Db => Span::styled("[db]   ", Style::default().fg(Color::Green)),
        Origin::File => Span::styled("[file] ", Style::default().fg(Color::Blue)),
    }
}

fn render_article_list(frame: &mut Frame, app: &App, area: Rect) {
    let articles = app.articles();
    let block = Block::default().borders(Borders::ALL);

    if articles.is_empty() {
        let paragraph = Paragraph::new("No articles yet.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = articles
        .iter()
        .map(|article| {
            let mut spans = vec![origin_badge(article), Span::raw(article.title())];
            if let Some(stored) = article.as_stored() {
                spans.push(Span::styled(
                    format!("  {}", stored.created_at.format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.cursor));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_article_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(article) = app.selected_article() else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} | {} ", article.title(), article.category().label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let width = block.inner(area).width as usize;
    let mut text = markup::render(article.content(), width);
    match article {
        Article::Stored(stored) => text.push_str(&format!(
            "\n\nPosted {} | updated {}",
            stored.created_at.format("%Y-%m-%d %H:%M"),
            stored.updated_at.format("%Y-%m-%d %H:%M")
        )),
        Article::File(file) => text.push_str(&format!("\n\nSource: {}", file.path.display())),
    }
    text.push_str("\n\n← Esc: back to the article list");

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(flash) = &app.flash {
        let color = match flash.level {
            FlashLevel::Success => Color::Green,
            FlashLevel::Warning => Color::Yellow,
            FlashLevel::Error => Color::Red,
        };
        let paragraph = Paragraph::new(flash.text.as_str()).style(Style::default().fg(color));
        frame.render_widget(paragraph, area);
        return;
    }

    let keys = if app.session.is_admin() {
        "🔓 admin | n:new  e:edit  d:delete  x:logout  ?:help  q:quit"
    } else {
        "tab:category  j/k:nav  enter:open  esc:back  a:admin  ?:help  q:quit"
    };
    let paragraph = Paragraph::new(keys).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_login(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, frame.area());

    let block = Block::default()
        .title(" Admin password ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let masked = "*".repeat(app.password_input.chars().count());
    let paragraph = Paragraph::new(format!("> {masked}_")).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_editor(frame: &mut Frame, editor: &Editor) {
    let area = centered_rect(90, 85, frame.area());

    let block = Block::default()
        .title(editor.heading())
        .title_bottom(" Tab: switch field | Ctrl+S: save | Esc: cancel ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(inner);
    let inputs = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);

    let focus = |field: EditorField| {
        if editor.field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let title_cursor = if editor.field == EditorField::Title { "_" } else { "" };
    let title = Paragraph::new(format!("{}{title_cursor}", editor.title)).block(
        Block::default()
            .title(" Title ")
            .borders(Borders::ALL)
            .border_style(focus(EditorField::Title)),
    );
    frame.render_widget(title, inputs[0]);

    let content_cursor = if editor.field == EditorField::Content { "_" } else { "" };
    let content = Paragraph::new(format!("{}{content_cursor}", editor.content))
        .block(
            Block::default()
                .title(" Content (HTML allowed) ")
                .borders(Borders::ALL)
                .border_style(focus(EditorField::Content)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(content, inputs[1]);

    let preview_block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let width = preview_block.inner(columns[1]).width as usize;
    let preview = Paragraph::new(editor.preview(width))
        .block(preview_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(preview, columns[1]);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   Tab / l / →   Next category",
        "   S-Tab / h / ← Previous category",
        "   j / ↓         Move down / scroll",
        "   k / ↑         Move up / scroll",
        "   Enter         Open article",
        "   Esc           Back to the list",
        "   r             Reload articles",
        "",
        " Admin:",
        "   a             Log in",
        "   x             Log out",
        "   n             New article",
        "   e             Edit article",
        "   d             Delete article",
        "",
        " Editor:",
        "   Tab           Switch title/content",
        "   Ctrl+S        Save",
        "   Esc           Cancel",
        "",
        " General:",
        "   ?             Toggle this help",
        "   q             Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Secrets};
    use crate::tui::AppAction;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn draws_list_and_detail() {
        let dir = tempfile::tempdir().unwrap();
        let scary = dir.path().join("articles").join("scary");
        std::fs::create_dir_all(&scary).unwrap();
        std::fs::write(scary.join("Mirror.html"), "<p>Something in the glass</p>").unwrap();

        let config = Config {
            db_path: dir.path().join("blog.db").to_string_lossy().to_string(),
            articles_dir: dir.path().join("articles").to_string_lossy().to_string(),
            site_title: "Ghost Notes".into(),
            caption: "notes".into(),
            about: "about".into(),
            links: Vec::new(),
        };
        let mut app = App::new(&config, Secrets::default()).await.unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let list = screen(&terminal);
        assert!(list.contains("Ghost Notes"));
        assert!(list.contains("[file] Mirror"));

        app.handle_action(AppAction::Open).await.unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let detail = screen(&terminal);
        assert!(detail.contains("Something in the glass"));
        assert!(!detail.contains("<p>"));
    }

    #[tokio::test]
    async fn empty_category_shows_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("blog.db").to_string_lossy().to_string(),
            articles_dir: dir.path().join("articles").to_string_lossy().to_string(),
            site_title: "Empty".into(),
            caption: String::new(),
            about: String::new(),
            links: Vec::new(),
        };
        let app = App::new(&config, Secrets::default()).await.unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(screen(&terminal).contains("No articles yet."));
    }
}
