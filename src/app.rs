use std::collections::BTreeMap;

use crate::config::{Config, Link, Secrets};
use crate::content::{Aggregator, FileLoader};
use crate::db::ArticleStore;
use crate::editor::{Editor, EditorTarget};
use crate::error::{AppError, Result};
use crate::models::{Article, Category};
use crate::session::{Session, ViewState};
use crate::tui::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Login,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

/// One-line message shown until the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

impl Flash {
    fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    fn gone() -> Self {
        Self {
            level: FlashLevel::Warning,
            text: "Article no longer exists".to_string(),
        }
    }

    fn from_error(err: &AppError) -> Self {
        let level = match err {
            AppError::Auth(_) => FlashLevel::Error,
            _ => FlashLevel::Warning,
        };
        Self {
            level,
            text: err.to_string(),
        }
    }
}

pub struct SiteInfo {
    pub title: String,
    pub caption: String,
    pub about: String,
    pub links: Vec<Link>,
}

pub struct App {
    // Data
    pub lists: BTreeMap<Category, Vec<Article>>,
    pub site: SiteInfo,

    // UI State
    pub active: Category,
    pub cursor: usize,
    pub detail_scroll: u16,
    pub mode: InputMode,
    pub show_help: bool,
    pub password_input: String,
    pub editor: Option<Editor>,
    pub flash: Option<Flash>,
    pub session: Session,

    // Services
    aggregator: Aggregator,
    admin_password: Option<String>,
}

impl App {
    pub async fn new(config: &Config, secrets: Secrets) -> Result<Self> {
        let store = ArticleStore::open(&config.db_path).await?;
        let loader = FileLoader::new(config.articles_path());

        let mut app = Self {
            lists: BTreeMap::new(),
            site: SiteInfo {
                title: config.site_title.clone(),
                caption: config.caption.clone(),
                about: config.about.clone(),
                links: config.links.clone(),
            },
            active: Category::ALL[0],
            cursor: 0,
            detail_scroll: 0,
            mode: InputMode::Normal,
            show_help: false,
            password_input: String::new(),
            editor: None,
            flash: None,
            session: Session::new(),
            aggregator: Aggregator::new(store, loader),
            admin_password: secrets.admin_password,
        };
        app.reload().await?;
        Ok(app)
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn articles(&self) -> &[Article] {
        self.lists
            .get(&self.active)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: Category) -> usize {
        self.lists.get(&category).map_or(0, Vec::len)
    }

    pub fn view(&self) -> ViewState {
        self.session.view(self.active)
    }

    pub fn selected_article(&self) -> Option<&Article> {
        match self.view() {
            ViewState::List => None,
            ViewState::Detail(i) => self.articles().get(i),
        }
    }

    /// Article an admin action applies to: the open one, or the highlighted one.
    fn target_index(&self) -> Option<usize> {
        let index = match self.view() {
            ViewState::Detail(i) => i,
            ViewState::List => self.cursor,
        };
        (index < self.articles().len()).then_some(index)
    }

    /// Re-runs the aggregation for every category.
    pub async fn reload(&mut self) -> Result<()> {
        for category in Category::ALL {
            let articles = self.aggregator.aggregate(category).await?;
            self.session.clamp(category, articles.len());
            self.lists.insert(category, articles);
        }

        let len = self.articles().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        Ok(())
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        if !matches!(
            action,
            AppAction::LoginChar(_)
                | AppAction::LoginBackspace
                | AppAction::EditorChar(_)
                | AppAction::EditorNewline
                | AppAction::EditorBackspace
                | AppAction::EditorSwitchField
        ) {
            self.flash = None;
        }

        let outcome = self.dispatch(action).await;
        match outcome {
            Ok(quit) => Ok(quit),
            Err(e) if e.is_user_facing() => {
                self.flash = Some(Flash::from_error(&e));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextTab => self.switch_tab(self.active.next()),
            AppAction::PrevTab => self.switch_tab(self.active.prev()),

            AppAction::MoveUp => match self.view() {
                ViewState::List => self.cursor = self.cursor.saturating_sub(1),
                ViewState::Detail(_) => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            },

            AppAction::MoveDown => match self.view() {
                ViewState::List => {
                    let len = self.articles().len();
                    if len > 0 && self.cursor < len - 1 {
                        self.cursor += 1;
                    }
                }
                ViewState::Detail(_) => self.detail_scroll = self.detail_scroll.saturating_add(1),
            },

            AppAction::Open => {
                if self.view() == ViewState::List && self.cursor < self.articles().len() {
                    self.session.select(self.active, self.cursor);
                    self.detail_scroll = 0;
                }
            }

            AppAction::Back => {
                if let ViewState::Detail(i) = self.view() {
                    self.cursor = i;
                }
                self.session.back(self.active);
            }

            AppAction::Refresh => {}

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::LoginStart => {
                self.password_input.clear();
                self.mode = InputMode::Login;
            }
            AppAction::LoginChar(c) => self.password_input.push(c),
            AppAction::LoginBackspace => {
                self.password_input.pop();
            }
            AppAction::LoginCancel => {
                self.password_input.clear();
                self.mode = InputMode::Normal;
            }
            AppAction::LoginConfirm => {
                let submitted = std::mem::take(&mut self.password_input);
                self.mode = InputMode::Normal;
                self.session
                    .login(&submitted, self.admin_password.as_deref())?;
                self.flash = Some(Flash::success("Logged in as admin"));
            }
            AppAction::Logout => {
                if self.session.is_admin() {
                    self.session.logout();
                    self.flash = Some(Flash::success("Logged out"));
                }
            }

            AppAction::NewArticle => {
                self.session.require_admin()?;
                self.open_editor(Editor::create(self.active));
            }

            AppAction::EditArticle => {
                self.session.require_admin()?;
                let Some(index) = self.target_index() else {
                    return Ok(false);
                };
                let id = self.articles()[index].id().ok_or(AppError::ReadOnly)?;
                // Edit the current row, not the copy from the last reload
                match self.aggregator.store().get(id).await? {
                    Some(article) => self.open_editor(Editor::edit(&article)),
                    None => self.flash = Some(Flash::gone()),
                }
            }

            AppAction::DeleteArticle => {
                self.session.require_admin()?;
                if let Some(index) = self.target_index() {
                    self.delete_at(index).await?;
                }
            }

            AppAction::EditorChar(c) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.push(c);
                }
            }
            AppAction::EditorNewline => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.newline();
                }
            }
            AppAction::EditorBackspace => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.backspace();
                }
            }
            AppAction::EditorSwitchField => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.switch_field();
                }
            }
            AppAction::EditorCancel => self.close_editor(),
            AppAction::EditorSave => self.save_editor().await?,
        }

        self.reload().await?;
        Ok(false)
    }

    fn switch_tab(&mut self, category: Category) {
        self.active = category;
        self.cursor = 0;
        self.detail_scroll = 0;
    }

    fn open_editor(&mut self, editor: Editor) {
        self.editor = Some(editor);
        self.mode = InputMode::Editor;
    }

    fn close_editor(&mut self) {
        self.editor = None;
        self.mode = InputMode::Normal;
    }

    async fn delete_at(&mut self, index: usize) -> Result<()> {
        let id = self.articles()[index].id().ok_or(AppError::ReadOnly)?;

        // The flag may have changed since the control was drawn
        self.session.require_admin()?;
        self.aggregator.store().delete(id).await?;

        self.session.on_deleted(self.active, index);
        if self.cursor > index {
            self.cursor -= 1;
        }
        self.flash = Some(Flash::success("Article deleted"));
        Ok(())
    }

    async fn save_editor(&mut self) -> Result<()> {
        let Some(editor) = self.editor.as_ref() else {
            return Ok(());
        };
        // Keeps the editor open so the draft is not lost
        editor.validate()?;

        self.session.require_admin()?;
        let store = self.aggregator.store();
        match editor.target {
            EditorTarget::Create(category) => {
                store.create(category, &editor.title, &editor.content).await?;
                self.session.on_inserted(category, 0);
                if category == self.active && self.view() == ViewState::List {
                    self.cursor = 0;
                }
                self.flash = Some(Flash::success("Article published"));
            }
            EditorTarget::Update { id, .. } => {
                let updated = store.update(id, &editor.title, &editor.content).await?;
                self.flash = Some(if updated {
                    Flash::success("Article updated")
                } else {
                    Flash::gone()
                });
            }
        }

        self.close_editor();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, ValidationError};
    use crate::models::Origin;
    use tempfile::TempDir;

    const PASSWORD: &str = "open sesame";

    async fn app(dir: &TempDir) -> App {
        let secrets = Secrets {
            admin_password: Some(PASSWORD.to_string()),
        };
        app_with_secrets(dir, secrets).await
    }

    async fn app_with_secrets(dir: &TempDir, secrets: Secrets) -> App {
        let config = Config {
            db_path: dir.path().join("blog.db").to_string_lossy().to_string(),
            articles_dir: dir.path().join("articles").to_string_lossy().to_string(),
            site_title: "Test".into(),
            caption: String::new(),
            about: String::new(),
            links: Vec::new(),
        };
        App::new(&config, secrets).await.unwrap()
    }

    fn write_file(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join("articles").join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    async fn login(app: &mut App) {
        app.handle_action(AppAction::LoginStart).await.unwrap();
        for c in PASSWORD.chars() {
            app.handle_action(AppAction::LoginChar(c)).await.unwrap();
        }
        app.handle_action(AppAction::LoginConfirm).await.unwrap();
    }

    async fn publish(app: &mut App, title: &str, content: &str) {
        app.handle_action(AppAction::NewArticle).await.unwrap();
        for c in title.chars() {
            app.handle_action(AppAction::EditorChar(c)).await.unwrap();
        }
        app.handle_action(AppAction::EditorSwitchField).await.unwrap();
        for c in content.chars() {
            app.handle_action(AppAction::EditorChar(c)).await.unwrap();
        }
        app.handle_action(AppAction::EditorSave).await.unwrap();
    }

    #[tokio::test]
    async fn starts_with_empty_lists_and_list_views() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir).await;

        for category in Category::ALL {
            assert_eq!(app.count(category), 0);
            assert_eq!(app.session.view(category), ViewState::List);
        }
        assert!(app.selected_article().is_none());
    }

    #[tokio::test]
    async fn login_flow_sets_and_clears_admin() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;

        login(&mut app).await;
        assert!(app.session.is_admin());
        assert_eq!(app.mode, InputMode::Normal);
        assert!(app.password_input.is_empty());

        app.handle_action(AppAction::LoginStart).await.unwrap();
        app.handle_action(AppAction::LoginChar('x')).await.unwrap();
        app.handle_action(AppAction::LoginConfirm).await.unwrap();

        assert!(!app.session.is_admin());
        let flash = app.flash.clone().unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(flash.text, AuthError::Mismatch.to_string());
    }

    #[tokio::test]
    async fn empty_secret_never_unlocks_admin() {
        let dir = tempfile::tempdir().unwrap();
        let secrets_path = dir.path().join("secrets.toml");
        std::fs::write(&secrets_path, "admin_password = \"\"").unwrap();
        let secrets = Secrets::resolve(None, &secrets_path).unwrap();
        let mut app = app_with_secrets(&dir, secrets).await;

        app.handle_action(AppAction::LoginStart).await.unwrap();
        app.handle_action(AppAction::LoginConfirm).await.unwrap();

        assert!(!app.session.is_admin());
        assert_eq!(app.flash.as_ref().map(|f| f.level), Some(FlashLevel::Error));
    }

    #[tokio::test]
    async fn filesystem_fault_leaves_the_run_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;

        let chat = dir.path().join("articles").join("chat");
        std::fs::create_dir_all(&chat).unwrap();
        std::fs::write(chat.join("bad.txt"), [0xff, 0xfe, 0xfd]).unwrap();

        let err = app.handle_action(AppAction::Refresh).await.unwrap_err();
        assert!(!err.is_user_facing());
        assert!(app.flash.is_none());
    }

    #[tokio::test]
    async fn edit_of_vanished_row_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;
        login(&mut app).await;
        publish(&mut app, "Ghost", "was here").await;

        let id = app.articles()[0].id().unwrap();
        app.aggregator().store().delete(id).await.unwrap();

        app.handle_action(AppAction::EditArticle).await.unwrap();
        assert!(app.editor.is_none());
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(
            app.flash.as_ref().map(|f| f.text.as_str()),
            Some("Article no longer exists")
        );
        assert!(app.articles().is_empty());
    }

    #[tokio::test]
    async fn admin_actions_need_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;

        app.handle_action(AppAction::NewArticle).await.unwrap();
        assert!(app.editor.is_none());
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(
            app.flash.as_ref().map(|f| f.text.as_str()),
            Some("Admin login required")
        );
    }

    #[tokio::test]
    async fn save_rechecks_admin_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;
        login(&mut app).await;

        app.handle_action(AppAction::NewArticle).await.unwrap();
        app.editor = Some(Editor {
            title: "t".into(),
            content: "c".into(),
            ..Editor::create(Category::Scary)
        });
        app.session.logout();
        app.handle_action(AppAction::EditorSave).await.unwrap();

        assert_eq!(app.count(Category::Scary), 0);
        assert!(app.editor.is_some());
    }

    #[tokio::test]
    async fn empty_title_is_a_warning_and_keeps_draft() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;
        login(&mut app).await;

        publish(&mut app, "", "body").await;

        let flash = app.flash.clone().unwrap();
        assert_eq!(flash.level, FlashLevel::Warning);
        assert_eq!(flash.text, ValidationError::EmptyTitle.to_string());
        assert_eq!(app.mode, InputMode::Editor);
        assert_eq!(app.editor.as_ref().unwrap().content, "body");
        assert_eq!(app.count(Category::Scary), 0);
    }

    #[tokio::test]
    async fn publish_then_delete_in_tech() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;
        login(&mut app).await;
        app.handle_action(AppAction::NextTab).await.unwrap();
        app.handle_action(AppAction::NextTab).await.unwrap();
        assert_eq!(app.active, Category::Tech);

        publish(&mut app, "Hello", "<b>Hi</b>").await;

        assert_eq!(app.mode, InputMode::Normal);
        let articles = app.articles();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id(), Some(1));
        assert_eq!(articles[0].title(), "Hello");
        assert_eq!(articles[0].content(), "<b>Hi</b>");
        assert_eq!(articles[0].origin(), Origin::Db);

        app.handle_action(AppAction::DeleteArticle).await.unwrap();
        assert!(app.articles().is_empty());
    }

    #[tokio::test]
    async fn deleting_open_article_returns_to_shorter_list() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "chat/cafe.txt", "a new cafe by the station");
        let mut app = app(&dir).await;
        login(&mut app).await;
        app.handle_action(AppAction::NextTab).await.unwrap();
        assert_eq!(app.active, Category::Chat);

        publish(&mut app, "Games", "lately I play a lot").await;
        assert_eq!(app.articles().len(), 2);

        app.handle_action(AppAction::Open).await.unwrap();
        assert_eq!(app.view(), ViewState::Detail(0));
        assert_eq!(app.selected_article().unwrap().title(), "Games");

        app.handle_action(AppAction::DeleteArticle).await.unwrap();
        assert_eq!(app.view(), ViewState::List);
        assert_eq!(app.articles().len(), 1);
        assert_eq!(app.articles()[0].title(), "cafe");
    }

    #[tokio::test]
    async fn file_articles_are_read_only() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "scary/mirror.html", "<p>boo</p>");
        let mut app = app(&dir).await;
        login(&mut app).await;

        app.handle_action(AppAction::Open).await.unwrap();
        app.handle_action(AppAction::EditArticle).await.unwrap();
        assert!(app.editor.is_none());
        assert_eq!(app.flash.as_ref().map(|f| f.level), Some(FlashLevel::Warning));

        app.handle_action(AppAction::DeleteArticle).await.unwrap();
        assert_eq!(app.count(Category::Scary), 1);
        assert_eq!(app.view(), ViewState::Detail(0));
    }

    #[tokio::test]
    async fn edit_keeps_detail_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;
        login(&mut app).await;
        publish(&mut app, "Draft", "first").await;

        app.handle_action(AppAction::Open).await.unwrap();
        app.handle_action(AppAction::EditArticle).await.unwrap();
        assert_eq!(app.mode, InputMode::Editor);
        for c in " and second".chars() {
            app.handle_action(AppAction::EditorChar(c)).await.unwrap();
        }
        app.handle_action(AppAction::EditorSave).await.unwrap();

        assert_eq!(app.view(), ViewState::Detail(0));
        assert_eq!(app.selected_article().unwrap().content(), "first and second");
    }

    #[tokio::test]
    async fn publishing_shifts_open_article() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir).await;
        login(&mut app).await;
        publish(&mut app, "older", "1").await;

        app.handle_action(AppAction::Open).await.unwrap();
        publish(&mut app, "newer", "2").await;

        assert_eq!(app.view(), ViewState::Detail(1));
        assert_eq!(app.selected_article().unwrap().title(), "older");
    }

    #[tokio::test]
    async fn back_returns_cursor_to_open_entry() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "tech/a.md", "a");
        write_file(&dir, "tech/b.txt", "b");
        let mut app = app(&dir).await;
        app.handle_action(AppAction::PrevTab).await.unwrap();
        assert_eq!(app.active, Category::Tech);

        app.handle_action(AppAction::MoveDown).await.unwrap();
        app.handle_action(AppAction::MoveDown).await.unwrap();
        assert_eq!(app.cursor, 1);

        app.handle_action(AppAction::Open).await.unwrap();
        assert_eq!(app.selected_article().unwrap().title(), "b");
        app.handle_action(AppAction::Back).await.unwrap();
        assert_eq!(app.view(), ViewState::List);
        assert_eq!(app.cursor, 1);
    }

    #[tokio::test]
    async fn removed_file_closes_stale_detail() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "scary/real.txt", "this is scary");
        let mut app = app(&dir).await;

        app.handle_action(AppAction::Open).await.unwrap();
        assert_eq!(app.view(), ViewState::Detail(0));

        std::fs::remove_file(dir.path().join("articles/scary/real.txt")).unwrap();
        app.handle_action(AppAction::Refresh).await.unwrap();
        assert_eq!(app.view(), ViewState::List);
    }
}
