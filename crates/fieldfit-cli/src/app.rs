use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fieldfit_config::Config;
use fieldfit_engine::{
    ConstrainedField, Constraints, FieldRow, ReflowResult, TextBuffer, TextControl, Viewport,
    field_rows,
};
use std::path::PathBuf;

/// Columns taken by the outer margin and the textarea border.
const TEXTAREA_CHROME: u16 = 4;

pub struct App {
    pub field: ConstrainedField,
    pub buffer: TextBuffer,
    pub last_result: Option<ReflowResult>,
    pub should_quit: bool,
    /// Loaded config and where Ctrl+S writes it back
    config: Option<(Config, PathBuf)>,
}

impl App {
    pub fn new(constraints: Constraints, terminal_width: u16) -> Self {
        let mut app = Self {
            field: ConstrainedField::new(constraints, textarea_viewport(terminal_width)),
            buffer: TextBuffer::default(),
            last_result: None,
            should_quit: false,
            config: None,
        };
        app.field.focus();
        app.format();
        app
    }

    pub fn with_config(mut self, config: Config, config_path: PathBuf) -> Self {
        self.config = Some((config, config_path));
        self
    }

    /// The field as it would be stored, one entry per line.
    pub fn field_rows(&self) -> Vec<FieldRow> {
        field_rows(self.buffer.value())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Resize(width, _) => self.resize(width),
            Event::FocusGained => self.field.focus(),
            Event::FocusLost => self.field.blur(&mut self.buffer),
            _ => {}
        }
    }

    pub fn resize(&mut self, terminal_width: u16) {
        self.field.set_viewport(textarea_viewport(terminal_width));
        self.format();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            if let Err(e) = self.save_limits() {
                log::warn!("Failed to save limits: {e:?}");
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::F(2) => self.adjust_limits(-1, 0),
            KeyCode::F(3) => self.adjust_limits(1, 0),
            KeyCode::F(4) => self.adjust_limits(0, -1),
            KeyCode::F(5) => self.adjust_limits(0, 1),
            _ if !self.field.is_focused() => {}
            KeyCode::Char(ch) => {
                self.buffer.insert_char(ch);
                self.format();
            }
            KeyCode::Enter => {
                self.buffer.insert_char('\n');
                self.format();
            }
            KeyCode::Backspace => {
                if self.buffer.backspace() {
                    self.format();
                }
            }
            KeyCode::Delete => {
                if self.buffer.delete_forward() {
                    self.format();
                }
            }
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Home => self.buffer.move_home(),
            KeyCode::End => self.buffer.move_end(),
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if !self.field.is_focused() {
            self.field.focus();
        }
        self.buffer.insert_str(text);
        self.field.handle_paste();
        self.format();
    }

    fn toggle_focus(&mut self) {
        if self.field.is_focused() {
            self.field.blur(&mut self.buffer);
        } else {
            self.field.focus();
        }
    }

    fn adjust_limits(&mut self, chars_delta: isize, lines_delta: isize) {
        let current = *self.field.constraints();
        let chars = current
            .max_chars_per_line
            .checked_add_signed(chars_delta)
            .unwrap_or(0);
        let lines = current.max_lines.checked_add_signed(lines_delta).unwrap_or(0);

        match Constraints::new(chars, lines) {
            Ok(constraints) => {
                self.field.update_constraints(constraints);
                self.format();
            }
            Err(e) => log::warn!("Ignoring limit change: {e}"),
        }
    }

    /// Write the current limits to the config file, keeping its other settings.
    pub fn save_limits(&mut self) -> anyhow::Result<()> {
        let Some((config, path)) = &mut self.config else {
            log::debug!("no config file to save limits to");
            return Ok(());
        };
        let constraints = self.field.constraints();
        config.max_chars_per_line = constraints.max_chars_per_line;
        config.max_lines = constraints.max_lines;
        config.save_to_path(path.as_path())?;
        log::info!("Saved limits to {}", path.display());
        Ok(())
    }

    fn format(&mut self) {
        self.last_result = Some(self.field.format(&mut self.buffer));
    }
}

fn textarea_viewport(terminal_width: u16) -> Viewport {
    Viewport::from_columns(terminal_width.saturating_sub(TEXTAREA_CHROME))
}
