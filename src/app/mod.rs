//! The application shell: key dispatch, cursor handling, prompts, and the
//! single-threaded event loop.
//!
//! Every user action runs to completion on the event loop before the next
//! one is read, so no two mutations of the session can interleave.

mod find;

pub use find::FindState;

use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use unicode_width::UnicodeWidthChar;

use crate::config::Config;
use crate::error::EditorError;
use crate::model::{Origin, Session};
use crate::storage::{KeyValueStore, RecordStore};
use crate::transfer;
use crate::view;
use crate::view::theme::Theme;

/// What the status-line prompt is collecting input for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PromptKind {
    Rename { old: String },
    Open,
    Find,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Rename { .. } => "Rename tab",
            PromptKind::Open => "Open file",
            PromptKind::Find => "Find",
        }
    }
}

pub struct App<S> {
    pub(crate) session: Session<S>,
    pub(crate) config: Config,
    pub(crate) theme: Theme,

    /// Cursor byte offset in the surface, always on a char boundary.
    pub(crate) cursor: usize,
    pub(crate) scroll_top: usize,
    pub(crate) scroll_left: usize,

    /// Status-bar notice from the last action.
    pub(crate) status: String,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) find: FindState,

    export_dir: PathBuf,
    folder_label: String,
    /// Visible text rows from the last layout pass, for page movement.
    page_rows: usize,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(
        config: Config,
        records: RecordStore<S>,
        export_dir: PathBuf,
        folder_label: impl Into<String>,
        theme_override: Option<&str>,
    ) -> Self {
        let theme = match theme_override {
            Some(name) => Theme::from_name(name),
            None => match records.theme() {
                Some(name) => Theme::from_name(&name),
                None => Theme::from_name(&config.theme),
            },
        };
        Self {
            session: Session::new(records),
            config,
            theme,
            cursor: 0,
            scroll_top: 0,
            scroll_left: 0,
            status: String::new(),
            prompt: None,
            find: FindState::new(),
            export_dir,
            folder_label: folder_label.into(),
            page_rows: 20,
        }
    }

    /// Open the files given on the command line, then fall back to a fresh
    /// `Untitled-1` when nothing is open.
    pub fn bootstrap(&mut self, files: &[PathBuf]) {
        for path in files {
            if let Err(e) = self.import_path(path) {
                tracing::warn!(path = %path.display(), error = %e, "could not open file");
                self.notice(format!("Could not open {}: {}", path.display(), e));
            }
        }
        if self.session.tabs().is_empty() {
            if let Err(e) = self.session.create(None) {
                self.notice(e.to_string());
            }
            self.after_load();
        }
    }

    /// Run the event loop until quit.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        loop {
            let size = terminal.size()?;
            self.scroll_to_cursor(size.width, size.height);
            terminal.draw(|frame| view::draw(frame, self))?;

            let event = event::read()?;
            if !self.handle_event(event) {
                break;
            }
        }
        Ok(())
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    fn handle_event(&mut self, event: Event) -> bool {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Release {
                return true;
            }
            if self.prompt.is_some() {
                self.handle_prompt_key(key);
                return true;
            }
            return self.handle_key(key);
        }
        true
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key {
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => return false,

            KeyEvent {
                code: KeyCode::Char('z'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.undo(),

            KeyEvent {
                code: KeyCode::Char('y'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.redo(),

            KeyEvent {
                code: KeyCode::Char('s'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.save_active(),

            KeyEvent {
                code: KeyCode::Char('e'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.export_active(),

            KeyEvent {
                code: KeyCode::Char('n'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.new_tab(),

            KeyEvent {
                code: KeyCode::Char('w'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.close_active(),

            KeyEvent {
                code: KeyCode::Char('o'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.open_prompt(),

            KeyEvent {
                code: KeyCode::Char('f'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.find_prompt(),

            KeyEvent {
                code: KeyCode::Char('t'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.toggle_theme(),

            KeyEvent {
                code: KeyCode::F(2),
                ..
            } => self.rename_prompt(),

            KeyEvent {
                code: KeyCode::F(3),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => self.find_prev(),

            KeyEvent {
                code: KeyCode::F(3),
                ..
            } => self.find_next(),

            KeyEvent {
                code: KeyCode::PageDown,
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.next_tab(),

            KeyEvent {
                code: KeyCode::PageUp,
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.prev_tab(),

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
                self.insert_char(c)
            }

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => self.insert_str("\n"),

            KeyEvent {
                code: KeyCode::Tab, ..
            } => {
                let spaces = " ".repeat(self.config.editor.tab_size);
                self.insert_str(&spaces);
            }

            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => self.backspace(),

            KeyEvent {
                code: KeyCode::Delete,
                ..
            } => self.delete_forward(),

            KeyEvent {
                code: KeyCode::Left,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.move_left(),

            KeyEvent {
                code: KeyCode::Right,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.move_right(),

            KeyEvent {
                code: KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.move_vertical(-1),

            KeyEvent {
                code: KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.move_vertical(1),

            KeyEvent {
                code: KeyCode::Home,
                ..
            } => self.move_to_line_start(),

            KeyEvent {
                code: KeyCode::End, ..
            } => self.move_to_line_end(),

            KeyEvent {
                code: KeyCode::PageUp,
                ..
            } => self.move_vertical(-(self.page_rows as isize)),

            KeyEvent {
                code: KeyCode::PageDown,
                ..
            } => self.move_vertical(self.page_rows as isize),

            _ => {}
        }
        true
    }

    // --- editing -----------------------------------------------------------

    fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    fn insert_str(&mut self, s: &str) {
        if self.session.active().is_none() {
            self.notice(EditorError::NoActiveTab.to_string());
            return;
        }
        let mut text = self.session.surface().to_string();
        text.insert_str(self.cursor, s);
        self.session.edit(&text, Origin::User);
        self.cursor += s.len();
        self.find.refresh(self.session.surface());
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let surface = self.session.surface();
        let removed = surface[..self.cursor]
            .chars()
            .next_back()
            .map(char::len_utf8)
            .unwrap_or(0);
        let start = self.cursor - removed;
        let mut text = surface.to_string();
        text.replace_range(start..self.cursor, "");
        self.session.edit(&text, Origin::User);
        self.cursor = start;
        self.find.refresh(self.session.surface());
    }

    fn delete_forward(&mut self) {
        let surface = self.session.surface();
        if self.cursor >= surface.len() {
            return;
        }
        let removed = surface[self.cursor..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        let mut text = surface.to_string();
        text.replace_range(self.cursor..self.cursor + removed, "");
        self.session.edit(&text, Origin::User);
        self.find.refresh(self.session.surface());
    }

    fn undo(&mut self) {
        if self.session.undo() {
            self.clamp_cursor();
            self.find.refresh(self.session.surface());
        }
    }

    fn redo(&mut self) {
        if self.session.redo() {
            self.clamp_cursor();
            self.find.refresh(self.session.surface());
        }
    }

    // --- tabs --------------------------------------------------------------

    fn new_tab(&mut self) {
        match self.session.create(None) {
            Ok(id) => {
                self.after_load();
                self.notice(format!("Created {}", id));
            }
            Err(e) => self.notice(e.to_string()),
        }
    }

    fn close_active(&mut self) {
        let Some(id) = self.session.active().map(String::from) else {
            self.notice(EditorError::NoActiveTab.to_string());
            return;
        };
        match self.session.close(&id) {
            Ok(()) => {
                self.after_load();
                self.notice(format!("Closed {}", id));
            }
            Err(e) => self.notice(e.to_string()),
        }
    }

    fn next_tab(&mut self) {
        let Some(active) = self.session.active() else {
            return;
        };
        let Some(next) = self.session.tabs().next_after(active).map(String::from) else {
            return;
        };
        self.switch_tab(&next);
    }

    fn prev_tab(&mut self) {
        let Some(active) = self.session.active() else {
            return;
        };
        let Some(prev) = self.session.tabs().prev_before(active).map(String::from) else {
            return;
        };
        self.switch_tab(&prev);
    }

    fn switch_tab(&mut self, id: &str) {
        if self.session.active() == Some(id) {
            return;
        }
        match self.session.activate(id) {
            Ok(()) => self.after_load(),
            Err(e) => self.notice(e.to_string()),
        }
    }

    // --- prompts -----------------------------------------------------------

    fn rename_prompt(&mut self) {
        let Some(old) = self.session.active().map(String::from) else {
            self.notice(EditorError::NoActiveTab.to_string());
            return;
        };
        self.prompt = Some(Prompt {
            input: old.clone(),
            kind: PromptKind::Rename { old },
        });
    }

    fn open_prompt(&mut self) {
        self.prompt = Some(Prompt {
            kind: PromptKind::Open,
            input: String::new(),
        });
    }

    fn find_prompt(&mut self) {
        if self.session.active().is_none() {
            self.notice(EditorError::NoActiveTab.to_string());
            return;
        }
        self.prompt = Some(Prompt {
            kind: PromptKind::Find,
            input: self.find.query().to_string(),
        });
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.commit_prompt(prompt);
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn commit_prompt(&mut self, prompt: Prompt) {
        match prompt.kind {
            PromptKind::Rename { old } => {
                let new = prompt.input.trim().to_string();
                if new.is_empty() || new == old {
                    return;
                }
                match self.session.rename(&old, &new) {
                    Ok(()) => self.notice(format!("Renamed {} to {}", old, new)),
                    Err(e) => self.notice(e.to_string()),
                }
            }
            PromptKind::Open => {
                let path = PathBuf::from(prompt.input.trim());
                match self.import_path(&path) {
                    Ok(()) => self.notice(format!("Opened {}", path.display())),
                    Err(e) => self.notice(format!("Could not open {}: {}", path.display(), e)),
                }
            }
            PromptKind::Find => {
                self.find.set_query(prompt.input, self.session.surface());
                if !self.find.is_active() {
                    return;
                }
                match self.find.seek(self.cursor) {
                    Some(pos) => self.cursor = pos,
                    None => self.notice("No matches"),
                }
            }
        }
    }

    fn find_next(&mut self) {
        if let Some(pos) = self.find.next() {
            self.cursor = pos;
        }
    }

    fn find_prev(&mut self) {
        if let Some(pos) = self.find.prev() {
            self.cursor = pos;
        }
    }

    // --- persistence and transfer -------------------------------------------

    fn save_active(&mut self) {
        match self.session.persist_active() {
            Ok(id) => self.notice(format!("Saved {}", id)),
            Err(e) => self.notice(e.to_string()),
        }
    }

    fn export_active(&mut self) {
        let Some(id) = self.session.active().map(String::from) else {
            self.notice(EditorError::NoActiveTab.to_string());
            return;
        };
        match transfer::export_document(
            &self.export_dir,
            &self.folder_label,
            &id,
            self.session.surface(),
        ) {
            Ok(path) => {
                // Exporting also refreshes the persisted record, like the
                // original save-to-computer path.
                if let Err(e) = self.session.persist_active() {
                    self.notice(e.to_string());
                    return;
                }
                self.notice(format!("Exported {}", path.display()));
            }
            Err(e) => self.notice(format!("Export failed: {}", e)),
        }
    }

    fn import_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let (name, content) = transfer::read_payload(path)?;
        self.session.open_payload(&name, &content)?;
        self.after_load();
        Ok(())
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.session.records_mut().set_theme(self.theme.name()) {
            self.notice(e.to_string());
            return;
        }
        self.notice(format!("Theme: {}", self.theme.name()));
    }

    // --- cursor ------------------------------------------------------------

    fn move_left(&mut self) {
        if let Some(c) = self.session.surface()[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(c) = self.session.surface()[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let text = self.session.surface();
        let starts = line_starts(text);
        let line = line_of(&starts, self.cursor);
        let col_chars = text[starts[line]..self.cursor].chars().count();

        let target = (line as isize + delta).clamp(0, starts.len() as isize - 1) as usize;
        let slice = line_slice(text, &starts, target);
        let keep = col_chars.min(slice.chars().count());
        let offset: usize = slice.chars().take(keep).map(char::len_utf8).sum();
        self.cursor = starts[target] + offset;
    }

    fn move_to_line_start(&mut self) {
        let text = self.session.surface();
        let starts = line_starts(text);
        self.cursor = starts[line_of(&starts, self.cursor)];
    }

    fn move_to_line_end(&mut self) {
        let text = self.session.surface();
        let starts = line_starts(text);
        let line = line_of(&starts, self.cursor);
        self.cursor = starts[line] + line_slice(text, &starts, line).len();
    }

    /// Pull the cursor back onto a char boundary after the surface was
    /// replaced wholesale (undo, redo, tab switch).
    fn clamp_cursor(&mut self) {
        let text = self.session.surface();
        if self.cursor > text.len() {
            self.cursor = text.len();
        }
        while !text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    /// Reset view state after the surface was replaced by a load.
    fn after_load(&mut self) {
        self.cursor = 0;
        self.scroll_top = 0;
        self.scroll_left = 0;
        self.find.refresh(self.session.surface());
    }

    fn scroll_to_cursor(&mut self, width: u16, height: u16) {
        let text_rows = height.saturating_sub(2) as usize;
        let text_cols = (width as usize).saturating_sub(self.gutter_cols()).max(1);
        if text_rows > 0 {
            self.page_rows = text_rows;
        }
        let (line, col) = self.cursor_line_col();

        if line < self.scroll_top {
            self.scroll_top = line;
        }
        if text_rows > 0 && line >= self.scroll_top + text_rows {
            self.scroll_top = line + 1 - text_rows;
        }
        if col < self.scroll_left {
            self.scroll_left = col;
        }
        if col >= self.scroll_left + text_cols {
            self.scroll_left = col + 1 - text_cols;
        }
    }

    /// Cursor position as (line index, display column).
    pub(crate) fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.session.surface()[..self.cursor];
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .unwrap_or_default()
            .chars()
            .map(|c| c.width().unwrap_or(0))
            .sum();
        (line, col)
    }

    /// Width of the line-number gutter in columns, zero when disabled.
    pub(crate) fn gutter_cols(&self) -> usize {
        if !self.config.editor.line_numbers {
            return 0;
        }
        let total_lines = self.session.surface().split('\n').count();
        total_lines.to_string().len().max(3) + 1
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }
}

/// Byte offsets of each line start, including the implicit first line.
fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn line_of(starts: &[usize], cursor: usize) -> usize {
    match starts.binary_search(&cursor) {
        Ok(line) => line,
        Err(line) => line - 1,
    }
}

/// The text of a line, excluding its trailing newline.
fn line_slice<'a>(text: &'a str, starts: &[usize], line: usize) -> &'a str {
    let start = starts[line];
    let end = starts
        .get(line + 1)
        .map(|next| next - 1)
        .unwrap_or(text.len());
    &text[start..end]
}
