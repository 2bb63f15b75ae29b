use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;

use crate::error::GameError;
use crate::game::{Board, Renderer};
use crate::grid::Cell;
use crate::input::{Key, KeySource};
use crate::snake::Direction;

const INPUT_POLL_MS: u64 = 50;

const EMPTY_CHAR: char = '.';
const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';

const HUD_HINT: &str = "WASD/arrows to move, q/Esc/Ctrl+C to quit";

type Glyph = (char, Color);

/// Terminal mode switching for the length of a game.
pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    /// The bordered board plus one HUD line must fit on screen.
    pub fn check_size(&self, height: i16, width: i16) -> Result<(), GameError> {
        let (actual_w, actual_h) = terminal::size().map_err(GameError::Terminal)?;
        let (needed_w, needed_h) = (width as u16 + 2, height as u16 + 3);

        if actual_w < needed_w || actual_h < needed_h {
            return Err(GameError::TerminalTooSmall { needed_w, needed_h, actual_w, actual_h });
        }
        Ok(())
    }

    /// On failure, whatever part of the setup already happened is undone.
    pub fn setup(&mut self) -> io::Result<()> {
        let res = self.enter();
        undo_on_err(res, || {
            if let Err(e) = self.restore() {
                warn!("could not restore terminal after failed setup: {}", e);
            }
        })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    fn enter(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
    }
}

fn undo_on_err<T, F: FnOnce()>(res: io::Result<T>, undo: F) -> io::Result<T> {
    if res.is_err() {
        undo();
    }
    res
}

/// Draws the board inside a border, repainting only cells that changed.
pub struct TermRenderer {
    width: i16,
    height: i16,
    stdout: Stdout,
    screen: Vec<Glyph>,
    last_hud: String,
    needs_full: bool,
}

impl TermRenderer {
    pub fn new(height: i16, width: i16) -> Self {
        TermRenderer {
            width,
            height,
            stdout: stdout(),
            screen: vec![(' ', Color::Reset); height as usize * width as usize],
            last_hud: String::new(),
            needs_full: true,
        }
    }

    fn draw_borders(&mut self) -> io::Result<()> {
        let end_x = self.width as u16 + 1;
        let end_y = self.height as u16 + 1;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch, Color::Reset)?;
            self.print_at((x, end_y), ch, Color::Reset)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|', Color::Reset)?;
            self.print_at((end_x, y), '|', Color::Reset)?;
        }

        Ok(())
    }

    fn draw_hud(&mut self, score: usize) -> io::Result<()> {
        let hud = format!("Score: {}  |  {}", score, HUD_HINT);
        if self.needs_full || hud != self.last_hud {
            queue!(
                self.stdout,
                cursor::MoveTo(0, self.height as u16 + 2),
                terminal::Clear(ClearType::CurrentLine),
                style::Print(&hud)
            )?;
            self.last_hud = hud;
        }
        Ok(())
    }

    fn print_at(&mut self, pos: (u16, u16), ch: char, color: Color) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(ch),
            style::ResetColor
        )
    }
}

impl Renderer for TermRenderer {
    fn draw(&mut self, board: &Board) -> io::Result<()> {
        let grid = board.grid();
        let snake = board.snake();

        if self.needs_full {
            queue!(self.stdout, terminal::Clear(ClearType::All))?;
            self.draw_borders()?;
        }

        for pos in grid.positions() {
            let glyph = if pos == snake.head() {
                (snake.head_char(), Color::Green)
            } else {
                glyph_for(grid.get(pos))
            };

            let idx = self.width as usize * pos.0 as usize + pos.1 as usize;
            if self.needs_full || self.screen[idx] != glyph {
                self.screen[idx] = glyph;
                self.print_at((pos.1 as u16 + 1, pos.0 as u16 + 1), glyph.0, glyph.1)?;
            }
        }

        self.draw_hud(board.score())?;
        self.needs_full = false;
        self.stdout.flush()
    }
}

fn glyph_for(cell: Cell) -> Glyph {
    match cell {
        Cell::Empty => (EMPTY_CHAR, Color::DarkGrey),
        Cell::SnakeBody => (SNAKE_BODY_CHAR, Color::Green),
        Cell::Food => (FOOD_CHAR, Color::Red),
    }
}

/// Keyboard events from the terminal.
pub struct TermKeys;

impl KeySource for TermKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        if !poll(Duration::from_millis(INPUT_POLL_MS))? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) if ev.kind == KeyEventKind::Press => Ok(Some(map_key(&ev))),
            _ => Ok(None),
        }
    }
}

pub fn map_key(ev: &KeyEvent) -> Key {
    if is_ctrl_c(ev) {
        return Key::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Key::Move(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Key::Move(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Key::Move(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Key::Move(Direction::Right),
        KeyCode::Char('q') | KeyCode::Esc => Key::Quit,
        _ => Key::Other,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
