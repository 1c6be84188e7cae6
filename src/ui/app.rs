use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::config::AppPaths;
use crate::db::{register, verify};
use crate::session::Session;

use super::forms::{ConfirmStudentDelete, LoginField, LoginForm, StudentField, StudentForm};
use super::helpers::{centered_rect, cursor_x, surface_error};
use super::screens::StudentsScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in the student table.
const PAGE_STEP: isize = 5;

/// Top-level navigation, which doubles as the session state machine: the
/// students screen exists only while someone is signed in.
enum Screen {
    Login(LoginForm),
    Students(StudentsScreen),
}

/// Modal states layered over the students screen.
enum Mode {
    Normal,
    AddingStudent(StudentForm),
    EditingStudent { position: usize, form: StudentForm },
    ConfirmStudentDelete(ConfirmStudentDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    paths: AppPaths,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, paths: AppPaths) -> Self {
        Self {
            conn,
            paths,
            screen: Screen::Login(LoginForm::default()),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Route a key press to the active screen or modal. Returns `true` when
    /// the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingStudent(form) => self.handle_add_student(code, form)?,
            Mode::EditingStudent { position, form } => {
                self.handle_edit_student(code, position, form)?
            }
            Mode::ConfirmStudentDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Login(ref mut form) => {
                let mut submit = false;
                match code {
                    KeyCode::Esc => *exit = true,
                    KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                        form.toggle_field()
                    }
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => submit = true,
                    KeyCode::Char(ch) => {
                        if form.push_char(ch) {
                            form.error = None;
                        }
                    }
                    _ => {}
                }
                if submit {
                    self.submit_login(false);
                }
                Ok(Mode::Normal)
            }
            Screen::Students(ref mut students) => {
                let mut status_to_set: Option<(String, StatusKind)> = None;

                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => *exit = true,
                    KeyCode::Up => students.move_selection(-1),
                    KeyCode::Down => students.move_selection(1),
                    KeyCode::PageUp => students.move_selection(-PAGE_STEP),
                    KeyCode::PageDown => students.move_selection(PAGE_STEP),
                    KeyCode::Home => students.select_first(),
                    KeyCode::End => students.select_last(),
                    KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                        self.status = None;
                        return Ok(Mode::AddingStudent(StudentForm::default()));
                    }
                    KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                        if let Some(student) = students.current_student() {
                            let mode = Mode::EditingStudent {
                                position: students.selected,
                                form: StudentForm::from_record(student),
                            };
                            self.status = None;
                            return Ok(mode);
                        }
                        status_to_set = Some((
                            "Please select a student to edit.".to_string(),
                            StatusKind::Error,
                        ));
                    }
                    KeyCode::Char('-') | KeyCode::Delete => {
                        if let Some(student) = students.current_student().cloned() {
                            let position = students.selected;
                            self.status = None;
                            return Ok(Mode::ConfirmStudentDelete(ConfirmStudentDelete {
                                position,
                                student,
                            }));
                        }
                        status_to_set = Some((
                            "Please select a student to delete.".to_string(),
                            StatusKind::Error,
                        ));
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => {
                        status_to_set = Some(match students.session.store.save() {
                            Ok(()) => (
                                "Student data saved.".to_string(),
                                StatusKind::Info,
                            ),
                            Err(err) => (err.to_string(), StatusKind::Error),
                        });
                    }
                    _ => {}
                }

                if let Some((text, kind)) = status_to_set {
                    self.set_status(text, kind);
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_add_student(&mut self, code: KeyCode, mut form: StudentForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add student cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_student(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingStudent(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_student(
        &mut self,
        code: KeyCode,
        position: usize,
        mut form: StudentForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_student(position, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingStudent { position, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmStudentDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmStudentDelete(confirm)),
        }
    }

    /// Dispatch a key pressed with Ctrl held. Returns `true` for Ctrl+C.
    /// Chords without a binding are swallowed so they never reach the
    /// plain-key handlers.
    pub(crate) fn handle_ctrl_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('c') => return Ok(true),
            KeyCode::Char('r') => self.handle_ctrl_r()?,
            KeyCode::Char('l') => self.handle_ctrl_l()?,
            KeyCode::Char('u') => self.handle_ctrl_u()?,
            _ => {}
        }
        Ok(false)
    }

    /// Ctrl+R on the login screen creates the account and signs in.
    pub(crate) fn handle_ctrl_r(&mut self) -> Result<()> {
        if matches!(self.screen, Screen::Login(_)) {
            self.submit_login(true);
        }
        Ok(())
    }

    /// Ctrl+L signs out from anywhere on the students screen, discarding any
    /// open form.
    pub(crate) fn handle_ctrl_l(&mut self) -> Result<()> {
        if !matches!(self.screen, Screen::Students(_)) {
            return Ok(());
        }

        self.mode = Mode::Normal;
        let previous = mem::replace(&mut self.screen, Screen::Login(LoginForm::default()));
        if let Screen::Students(students) = previous {
            let username = students.session.end();
            self.set_status(format!("Signed out {username}."), StatusKind::Info);
        }
        Ok(())
    }

    /// Ctrl+U empties the open student form.
    pub(crate) fn handle_ctrl_u(&mut self) -> Result<()> {
        match &mut self.mode {
            Mode::AddingStudent(form) | Mode::EditingStudent { form, .. } => form.clear(),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Login(form) => self.draw_login(frame, content_area, form),
            Screen::Students(students) => self.draw_students(frame, content_area, students),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, "Add Student", form),
            Mode::EditingStudent { position, form } => {
                let title = format!("Edit Student #{}", position + 1);
                self.draw_student_form(frame, area, &title, form)
            }
            Mode::ConfirmStudentDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect, form: &LoginForm) {
        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Sign In").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Username", LoginField::Username),
            form.build_line("Password", LoginField::Password),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to sign in • Ctrl+R to sign up • Tab to switch",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            LoginField::Username => ("Username: ", 0),
            LoginField::Password => ("Password: ", 1),
        };
        let x = cursor_x(inner, prefix, form.value_len(form.active));
        frame.set_cursor_position((x, inner.y.saturating_add(row)));
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect, students: &StudentsScreen) {
        let title = format!(
            "Student Information ({}) - signed in as {}",
            students.students().len(),
            students.session.username()
        );
        let block = Block::default().title(title).borders(Borders::ALL);

        if students.students().is_empty() {
            let message = Paragraph::new("No students yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(vec!["#", "Name", "Email", "Password"]).style(header_style);

        let rows = students
            .students()
            .iter()
            .enumerate()
            .map(|(idx, student)| {
                let row = Row::new(vec![
                    Cell::from((idx + 1).to_string()),
                    Cell::from(student.name.clone()),
                    Cell::from(student.email.clone()),
                    Cell::from(student.password.clone()),
                ]);
                if idx == students.selected {
                    row.style(
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    row
                }
            });

        let widths = [
            Constraint::Length(5),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ];
        let table = Table::new(rows, widths).header(header).block(block);

        // Selection is tracked on the screen; the state only drives scrolling.
        let mut state = TableState::default().with_selected(Some(students.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (Screen::Login(_), _) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Sign In   "),
                Span::styled("[Ctrl+R]", key_style),
                Span::raw(" Sign Up   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Quit"),
            ]),
            (_, Mode::AddingStudent(_)) | (_, Mode::EditingStudent { .. }) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Ctrl+U]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmStudentDelete(_)) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N]", key_style),
                Span::raw(" Keep"),
            ]),
            (Screen::Students(_), Mode::Normal) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[E]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[S]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Ctrl+L]", key_style),
                Span::raw(" Sign Out   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", StudentField::Name),
            form.build_line("Email", StudentField::Email),
            form.build_line("Password", StudentField::Password),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            StudentField::Name => ("Name: ", 0),
            StudentField::Email => ("Email: ", 1),
            StudentField::Password => ("Password: ", 2),
        };
        let x = cursor_x(inner, prefix, form.value_len(form.active));
        frame.set_cursor_position((x, inner.y.saturating_add(row)));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmStudentDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete student #{} ({})?",
                confirm.position + 1,
                confirm.student
            )),
            Line::from("The students file is rewritten immediately."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn submit_login(&mut self, sign_up: bool) {
        if let Err(err) = self.authenticate(sign_up) {
            let message = surface_error(&err);
            if let Screen::Login(form) = &mut self.screen {
                form.error = Some(message.clone());
            }
            self.set_status(message, StatusKind::Error);
        }
    }

    /// Verify (or register) the typed credential and move to the students
    /// screen with a freshly loaded session.
    fn authenticate(&mut self, sign_up: bool) -> Result<()> {
        let credential = match &self.screen {
            Screen::Login(form) => form.parse_inputs()?,
            Screen::Students(_) => return Ok(()),
        };

        if sign_up {
            register(&self.conn, &credential.username, &credential.password)?;
        } else if !verify(&self.conn, &credential.username, &credential.password)? {
            return Err(anyhow!("Invalid credentials."));
        }

        let session = Session::begin(credential.username, &self.paths.students_csv)?;
        let message = if sign_up {
            format!("Signup successful. Welcome, {}!", session.username())
        } else {
            format!(
                "Login successful. {} students loaded.",
                session.store.len()
            )
        };
        self.screen = Screen::Students(StudentsScreen::new(session));
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn students_mut(&mut self) -> Result<&mut StudentsScreen> {
        match &mut self.screen {
            Screen::Students(students) => Ok(students),
            Screen::Login(_) => Err(anyhow!("Sign in first.")),
        }
    }

    fn save_new_student(&mut self, form: &StudentForm) -> Result<()> {
        let record = form.parse_inputs()?;
        let message = format!("Added {}. Student data saved.", record.name);
        let students = self.students_mut()?;
        let position = students.session.store.add(record)?;
        students.selected = position;
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn save_existing_student(&mut self, position: usize, form: &StudentForm) -> Result<()> {
        let record = form.parse_inputs()?;
        let students = self.students_mut()?;
        students.session.store.update_at(position, record)?;
        students.selected = position;
        self.set_status("Student updated successfully.", StatusKind::Info);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmStudentDelete) -> Result<()> {
        let students = self.students_mut()?;
        let removed = students.session.store.delete_at(confirm.position)?;
        students.ensure_in_bounds();
        self.set_status(
            format!("Deleted {}. Student data saved.", removed.name),
            StatusKind::Info,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::db::{init_schema, read_students};
    use crate::models::StudentRecord;

    fn test_app() -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        (dir, App::new(conn, paths))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            assert!(!app.handle_key(KeyCode::Char(ch)).unwrap());
        }
    }

    fn fill_login(app: &mut App, username: &str, password: &str) {
        type_text(app, username);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, password);
    }

    fn fill_student(app: &mut App, name: &str, email: &str, password: &str) {
        type_text(app, name);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, email);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, password);
    }

    fn status_text(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    fn signed_up_app() -> (TempDir, App) {
        let (dir, mut app) = test_app();
        fill_login(&mut app, "alice", "pw1");
        app.handle_ctrl_r().unwrap();
        assert!(matches!(app.screen, Screen::Students(_)));
        (dir, app)
    }

    fn saved_students(app: &App) -> Vec<StudentRecord> {
        read_students(&app.paths.students_csv).unwrap()
    }

    #[test]
    fn sign_up_then_log_in_with_the_same_password() {
        let (_dir, mut app) = signed_up_app();
        assert_eq!(status_text(&app), "Signup successful. Welcome, alice!");

        app.handle_ctrl_l().unwrap();
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(status_text(&app), "Signed out alice.");

        fill_login(&mut app, "alice", "pw2");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(status_text(&app), "Invalid credentials.");

        app.handle_key(KeyCode::Backspace).unwrap();
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::Students(_)));
        assert_eq!(status_text(&app), "Login successful. 0 students loaded.");
    }

    #[test]
    fn duplicate_sign_up_is_reported() {
        let (_dir, mut app) = signed_up_app();
        app.handle_ctrl_l().unwrap();

        fill_login(&mut app, "alice", "pw2");
        app.handle_ctrl_r().unwrap();
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(status_text(&app), "Username already exists.");
    }

    #[test]
    fn credentials_are_compared_exactly_as_typed() {
        let (_dir, mut app) = signed_up_app();
        app.handle_ctrl_l().unwrap();

        fill_login(&mut app, "alice", "pw1 ");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(status_text(&app), "Invalid credentials.");

        let (_dir, mut app) = signed_up_app();
        app.handle_ctrl_l().unwrap();
        fill_login(&mut app, "alice ", "pw1");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(status_text(&app), "Invalid credentials.");
    }

    #[test]
    fn empty_login_fields_are_rejected() {
        let (_dir, mut app) = test_app();
        type_text(&mut app, "alice");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(status_text(&app), "All fields are required.");
        match &app.screen {
            Screen::Login(form) => {
                assert_eq!(form.error.as_deref(), Some("All fields are required."))
            }
            Screen::Students(_) => panic!("should still be on the login screen"),
        }

        let (_dir, mut app) = test_app();
        app.handle_ctrl_r().unwrap();
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(status_text(&app), "All fields are required.");
    }

    #[test]
    fn unbound_ctrl_chords_are_ignored() {
        let (_dir, mut app) = signed_up_app();
        assert!(!app.handle_ctrl_key(KeyCode::Char('q')).unwrap());
        assert!(!app.handle_ctrl_key(KeyCode::Char('a')).unwrap());
        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(app.screen, Screen::Students(_)));

        let (_dir, mut app) = test_app();
        app.handle_ctrl_key(KeyCode::Char('x')).unwrap();
        match &app.screen {
            Screen::Login(form) => assert!(form.username.is_empty()),
            Screen::Students(_) => panic!("should still be on the login screen"),
        }

        assert!(app.handle_ctrl_key(KeyCode::Char('c')).unwrap());
    }

    #[test]
    fn add_edit_delete_round_trip_through_the_file() {
        let (_dir, mut app) = signed_up_app();

        app.handle_key(KeyCode::Char('+')).unwrap();
        fill_student(&mut app, "Bob", "b@x.com", "pw");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            saved_students(&app),
            vec![StudentRecord::new("Bob", "b@x.com", "pw").unwrap()]
        );

        app.handle_key(KeyCode::Char('e')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        for _ in 0.."com".len() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_text(&mut app, "org");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(status_text(&app), "Student updated successfully.");
        assert_eq!(saved_students(&app)[0].email, "b@x.org");

        app.handle_key(KeyCode::Char('-')).unwrap();
        assert!(matches!(app.mode, Mode::ConfirmStudentDelete(_)));
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert_eq!(status_text(&app), "Deleted Bob. Student data saved.");
        assert!(saved_students(&app).is_empty());
    }

    #[test]
    fn incomplete_student_form_stays_open() {
        let (_dir, mut app) = signed_up_app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Bob");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(status_text(&app), "Email is required.");
        match &app.mode {
            Mode::AddingStudent(form) => assert_eq!(form.name, "Bob"),
            _ => panic!("form should stay open"),
        }

        app.handle_ctrl_u().unwrap();
        match &app.mode {
            Mode::AddingStudent(form) => assert!(form.name.is_empty()),
            _ => panic!("form should stay open"),
        }
    }

    #[test]
    fn actions_on_an_empty_table_explain_themselves() {
        let (_dir, mut app) = signed_up_app();

        app.handle_key(KeyCode::Char('e')).unwrap();
        assert_eq!(status_text(&app), "Please select a student to edit.");

        app.handle_key(KeyCode::Char('-')).unwrap();
        assert_eq!(status_text(&app), "Please select a student to delete.");

        app.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(status_text(&app), "Student data saved.");
        assert!(app.paths.students_csv.exists());
    }

    #[test]
    fn cancelling_delete_keeps_the_record() {
        let (_dir, mut app) = signed_up_app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        fill_student(&mut app, "Bob", "b@x.com", "pw");
        app.handle_key(KeyCode::Enter).unwrap();

        app.handle_key(KeyCode::Delete).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(status_text(&app), "Deletion cancelled.");
        assert_eq!(saved_students(&app).len(), 1);
    }

    #[test]
    fn quit_keys_depend_on_the_screen() {
        let (_dir, mut app) = test_app();
        // 'q' is just a character while typing a username.
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Esc).unwrap());

        let (_dir, mut app) = signed_up_app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn logout_discards_open_form_but_keeps_saved_records() {
        let (_dir, mut app) = signed_up_app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        fill_student(&mut app, "Bob", "b@x.com", "pw");
        app.handle_key(KeyCode::Enter).unwrap();

        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Unsaved");
        app.handle_ctrl_l().unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(app.screen, Screen::Login(_)));
        assert_eq!(saved_students(&app).len(), 1);
    }
}
