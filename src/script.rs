#[cfg(test)]
#[path = "./script_test.rs"]
mod script_test;

use thiserror::Error;
use tracing::warn;

use crate::def::{
    JEWELS_MAX, KEYS_MAX, MAGIC_MAX, MAX_ACTORS, SCORE_MAX, SOLID_INTANGIBLE, THOR,
    THOR_HEALTH_MAX, TILES_HIGH, TILES_WIDE, World,
};
use crate::env::{DialogKind, GotEnv, Sound};

const MAX_LABELS: usize = 32;
const MAX_GOSUB: usize = 32;
const MAX_FOR: usize = 10;
const MAX_STR: usize = 80;
const BUFFER_MAX: usize = 8192;

// inventory bit order; ITEMSAY indexes straight into this
const ITEM_NAMES: [&str; 16] = [
    "Enchanted Apple",
    "Lightning Power",
    "Winged Boots",
    "Wind Power",
    "Amulet of Protection",
    "Thunder Power",
    "Blue Crystal",
    "Red Crystal",
    "Green Crystal",
    "Ancient Coin",
    "Silver Key",
    "Golden Key",
    "Dragon Scale",
    "Ruby Ring",
    "Torch",
    "Magic Scroll",
];

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("can't read script")]
    CantReadScript,
    #[error("too many labels")]
    TooManyLabels,
    #[error("no end")]
    NoEnd,
    #[error("syntax error")]
    Syntax,
    #[error("out of range")]
    OutOfRange,
    #[error("undefined label")]
    UndefinedLabel,
    #[error("return without gosub")]
    ReturnWithoutGosub,
    #[error("nesting too deep")]
    Nesting,
    #[error("next without for")]
    NextWithoutFor,
}

impl ScriptError {
    /// Numeric codes kept stable for the host's error screen.
    pub fn code(&self) -> i32 {
        match self {
            ScriptError::OutOfMemory => 1,
            ScriptError::CantReadScript => 2,
            ScriptError::TooManyLabels => 3,
            ScriptError::NoEnd => 4,
            ScriptError::Syntax => 5,
            ScriptError::OutOfRange => 6,
            ScriptError::UndefinedLabel => 7,
            ScriptError::ReturnWithoutGosub => 8,
            ScriptError::Nesting => 9,
            ScriptError::NextWithoutFor => 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptResult {
    Done,
    Paused,
    Error(ScriptError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ScriptState {
    #[default]
    Ready,
    Paused,
    Resuming,
}

#[derive(Clone, Copy, Debug, Default)]
struct ForLoop {
    var: usize,
    limit: i32,
    resume: usize,
}

enum Flow {
    Next,
    Jump(usize),
    End,
    Pause,
    SkipToElse,
}

/// The SPEAK interpreter. One instance per session; execute() resets all
/// interpreter state, so scripts never leak variables into each other.
/// Source text is assembled into a flat null-separated statement tape and
/// run from there, with labels collected up front.
pub struct Scripts {
    num_var: [i32; 26],
    str_var: Vec<String>,
    labels: Vec<(String, usize)>,
    gosub_stack: Vec<usize>,
    for_stack: Vec<ForLoop>,
    buffer: Vec<u8>,
    ip: usize,
    state: ScriptState,
    index: i32,
    ask_var: usize,
}

pub fn new_scripts() -> Scripts {
    Scripts {
        num_var: [0; 26],
        str_var: vec![String::new(); 26],
        labels: Vec::new(),
        gosub_stack: Vec::new(),
        for_stack: Vec::new(),
        buffer: Vec::new(),
        ip: 0,
        state: ScriptState::Ready,
        index: 0,
        ask_var: 0,
    }
}

impl Scripts {
    /// Runs script `index` from the current area's SPEAK table. Returns
    /// Paused when a dialog command is waiting on the host; completion is
    /// signalled back via set_ask_response / dialog_closed followed by
    /// run_if_resuming.
    pub fn execute(&mut self, index: i32, w: &mut World, env: &mut dyn GotEnv) -> ScriptResult {
        self.reset();
        self.index = index;
        let key = format!("SPEAK{}", w.game.current_area);
        let src = match env.read_script_table(&key) {
            Some(s) => s,
            None => return self.abort(ScriptError::CantReadScript),
        };
        if let Err(e) = self.load(index, &src) {
            return self.abort(e);
        }
        self.run_from_ip(w, env)
    }

    /// Stores the 1-based choice of a completed ASK into its variable and
    /// marks the script resumable.
    pub fn set_ask_response(&mut self, choice: i32) {
        if self.state == ScriptState::Paused {
            self.num_var[self.ask_var] = choice;
            self.state = ScriptState::Resuming;
        }
    }

    /// Marks a completed SAY/TEXT dialog; the script resumes on the next
    /// run_if_resuming.
    pub fn dialog_closed(&mut self) {
        if self.state == ScriptState::Paused {
            self.state = ScriptState::Resuming;
        }
    }

    pub fn run_if_resuming(&mut self, w: &mut World, env: &mut dyn GotEnv) -> ScriptResult {
        if self.state != ScriptState::Resuming {
            return if self.state == ScriptState::Paused {
                ScriptResult::Paused
            } else {
                ScriptResult::Done
            };
        }
        self.state = ScriptState::Ready;
        self.run_from_ip(w, env)
    }

    fn reset(&mut self) {
        self.num_var = [0; 26];
        for s in &mut self.str_var {
            s.clear();
        }
        self.labels.clear();
        self.gosub_stack.clear();
        self.for_stack.clear();
        self.buffer.clear();
        self.ip = 0;
        self.state = ScriptState::Ready;
        self.ask_var = 0;
    }

    fn abort(&mut self, e: ScriptError) -> ScriptResult {
        warn!(
            script = self.index,
            line = self.line_number(),
            code = e.code(),
            "script aborted: {e}"
        );
        self.state = ScriptState::Ready;
        ScriptResult::Error(e)
    }

    /// 1-based statement number of the current instruction pointer, for
    /// abort diagnostics.
    fn line_number(&self) -> usize {
        self.buffer[..self.ip.min(self.buffer.len())]
            .iter()
            .filter(|&&b| b == 0)
            .count()
            + 1
    }

    fn run_from_ip(&mut self, w: &mut World, env: &mut dyn GotEnv) -> ScriptResult {
        match self.run(w, env) {
            Ok(r) => r,
            Err(e) => self.abort(e),
        }
    }

    /*
    =========================================================================

                    LOADING AND ASSEMBLY

    =========================================================================
    */

    /// Extracts script `index` from a SPEAK table: entries start at a
    /// `|nnn` header line and run until the next `|` line; `|STOP`
    /// terminates the table and `|EOF` before the header means the script
    /// is missing.
    fn load(&mut self, index: i32, src: &str) -> Result<(), ScriptError> {
        let header = format!("|{index}");
        let mut lines = src.lines();
        loop {
            let line = lines.next().ok_or(ScriptError::CantReadScript)?;
            let trimmed = line.trim();
            if trimmed == "|EOF" || trimmed == "|STOP" {
                return Err(ScriptError::CantReadScript);
            }
            if trimmed == header {
                break;
            }
        }
        let mut body = Vec::new();
        for line in lines {
            if line.trim_start().starts_with('|') {
                break;
            }
            body.push(line);
        }
        self.assemble(&body)
    }

    /// Single pass over the source: normalizes each line (whitespace
    /// stripped and letters uppercased outside quotes, comments cut at '
    /// or ` outside quotes), splits statements at `:` outside quotes,
    /// records labels (a short alphanumeric token in front of a `:`) as
    /// the offset of the following statement, and lays every statement
    /// down null-terminated.
    fn assemble(&mut self, lines: &[&str]) -> Result<(), ScriptError> {
        for line in lines {
            let mut norm = String::new();
            let mut in_quotes = false;
            for ch in line.chars() {
                if ch == '"' {
                    in_quotes = !in_quotes;
                    norm.push(ch);
                    continue;
                }
                if in_quotes {
                    norm.push(ch);
                    continue;
                }
                if ch == '\'' || ch == '`' {
                    break;
                }
                if ch.is_whitespace() {
                    continue;
                }
                norm.push(ch.to_ascii_uppercase());
            }

            let segments = split_outside_quotes(&norm, ':');
            let last = segments.len().saturating_sub(1);
            for (i, seg) in segments.iter().enumerate() {
                if seg.is_empty() {
                    continue;
                }
                let followed_by_colon = i < last;
                if followed_by_colon
                    && seg.len() < 10
                    && seg.bytes().all(|b| b.is_ascii_alphanumeric())
                {
                    if self.labels.len() >= MAX_LABELS {
                        return Err(ScriptError::TooManyLabels);
                    }
                    // the label names the next statement laid down
                    self.labels.push((seg.clone(), self.buffer.len()));
                    continue;
                }
                if self.buffer.len() + seg.len() + 1 > BUFFER_MAX {
                    return Err(ScriptError::OutOfMemory);
                }
                self.buffer.extend_from_slice(seg.as_bytes());
                self.buffer.push(0);
            }
        }
        Ok(())
    }

    fn label_offset(&self, name: &str) -> Result<usize, ScriptError> {
        self.labels
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, off)| off)
            .ok_or(ScriptError::UndefinedLabel)
    }

    /*
    =========================================================================

                    EXECUTION

    =========================================================================
    */

    fn entry_at(&self, off: usize) -> Option<(String, usize)> {
        if off >= self.buffer.len() {
            return None;
        }
        let end = self.buffer[off..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| off + p)
            .unwrap_or(self.buffer.len());
        let stmt = String::from_utf8_lossy(&self.buffer[off..end]).into_owned();
        Some((stmt, end + 1)) // next entry starts past the terminator
    }

    fn run(&mut self, w: &mut World, env: &mut dyn GotEnv) -> Result<ScriptResult, ScriptError> {
        loop {
            let (stmt, next) = self.entry_at(self.ip).ok_or(ScriptError::NoEnd)?;
            match self.exec_entry(&stmt, next, w, env)? {
                Flow::Next => self.ip = next,
                Flow::Jump(off) => self.ip = off,
                Flow::End => {
                    self.state = ScriptState::Ready;
                    return Ok(ScriptResult::Done);
                }
                Flow::Pause => {
                    self.ip = next;
                    self.state = ScriptState::Paused;
                    return Ok(ScriptResult::Paused);
                }
                Flow::SkipToElse => {
                    // a failed IF runs the remainder of a directly
                    // following ELSE entry, otherwise just falls through
                    self.ip = next;
                    if let Some((peek, peek_next)) = self.entry_at(self.ip) {
                        if let Some(rest) = peek.strip_prefix("ELSE") {
                            let rest = rest.to_string();
                            match self.exec_entry(&rest, peek_next, w, env)? {
                                Flow::Next => self.ip = peek_next,
                                Flow::Jump(off) => self.ip = off,
                                Flow::End => {
                                    self.state = ScriptState::Ready;
                                    return Ok(ScriptResult::Done);
                                }
                                Flow::Pause => {
                                    self.ip = peek_next;
                                    self.state = ScriptState::Paused;
                                    return Ok(ScriptResult::Paused);
                                }
                                Flow::SkipToElse => self.ip = peek_next,
                            }
                        }
                    }
                }
            }
        }
    }

    fn exec_entry(
        &mut self,
        stmt: &str,
        next: usize,
        w: &mut World,
        env: &mut dyn GotEnv,
    ) -> Result<Flow, ScriptError> {
        if stmt.is_empty() {
            return Ok(Flow::Next);
        }

        // assignments take priority over command prefixes
        let b = stmt.as_bytes();
        if b.len() >= 2 && b[0].is_ascii_uppercase() && b[1] == b'=' {
            let var = (b[0] - b'A') as usize;
            let mut pos = 2;
            let val = self.calc_value(stmt, &mut pos, w)?;
            self.num_var[var] = val;
            return Ok(Flow::Next);
        }
        if b.len() >= 3 && b[0].is_ascii_uppercase() && b[1] == b'$' && b[2] == b'=' {
            let var = (b[0] - b'A') as usize;
            let mut pos = 3;
            let val = self.calc_string(stmt, &mut pos)?;
            self.str_var[var] = val;
            return Ok(Flow::Next);
        }

        if stmt == "END" {
            return Ok(Flow::End);
        }
        if let Some(rest) = stmt.strip_prefix("GOTO") {
            return Ok(Flow::Jump(self.label_offset(rest)?));
        }
        if let Some(rest) = stmt.strip_prefix("GOSUB") {
            if self.gosub_stack.len() >= MAX_GOSUB {
                return Err(ScriptError::Nesting);
            }
            let off = self.label_offset(rest)?;
            self.gosub_stack.push(next);
            return Ok(Flow::Jump(off));
        }
        if stmt == "RETURN" {
            let off = self
                .gosub_stack
                .pop()
                .ok_or(ScriptError::ReturnWithoutGosub)?;
            return Ok(Flow::Jump(off));
        }
        if let Some(rest) = stmt.strip_prefix("FOR") {
            return self.cmd_for(rest, next, w);
        }
        if stmt.starts_with("NEXT") {
            // NEXT always binds the innermost loop, whatever variable (if
            // any) is written after it
            let top = self.for_stack.last().copied().ok_or(ScriptError::NextWithoutFor)?;
            self.num_var[top.var] += 1;
            if self.num_var[top.var] <= top.limit {
                return Ok(Flow::Jump(top.resume));
            }
            self.for_stack.pop();
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("IF") {
            return self.cmd_if(rest, next, w, env);
        }
        if stmt.starts_with("ELSE") {
            // reached only when the IF above succeeded
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("RUN") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.game.script_request = Some(n);
            return Ok(Flow::End);
        }
        if let Some(rest) = stmt.strip_prefix("ADDJEWELS") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.game.thor_info.jewels = (w.game.thor_info.jewels + n).clamp(0, JEWELS_MAX);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ADDHEALTH") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.update_actor(THOR, |t| {
                t.health = (t.health + n).clamp(0, THOR_HEALTH_MAX);
            });
            if w.thor().health == 0 {
                w.game.thor_dead = true;
            }
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ADDMAGIC") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.game.thor_info.magic = (w.game.thor_info.magic + n).clamp(0, MAGIC_MAX);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ADDKEYS") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.game.thor_info.keys = (w.game.thor_info.keys + n).clamp(0, KEYS_MAX);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ADDSCORE") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.game.thor_info.score = (w.game.thor_info.score + n).clamp(0, SCORE_MAX);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("SAY") {
            return self.cmd_say(rest, w, env);
        }
        if let Some(rest) = stmt.strip_prefix("ASK") {
            return self.cmd_ask(rest, env);
        }
        if let Some(rest) = stmt.strip_prefix("SOUND") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            env.play_sound(Sound::from_id(n), false);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("PLACETILE") {
            let mut pos = 0;
            let col = self.calc_value(rest, &mut pos, w)?;
            expect(rest, &mut pos, b',')?;
            let row = self.calc_value(rest, &mut pos, w)?;
            expect(rest, &mut pos, b',')?;
            let tile = self.calc_value(rest, &mut pos, w)?;
            if col < 0
                || col >= TILES_WIDE as i32
                || row < 0
                || row >= TILES_HIGH as i32
                || !(0..=255).contains(&tile)
            {
                return Err(ScriptError::OutOfRange);
            }
            w.screen.place_tile(col as usize, row as usize, tile as u8);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ITEMGIVE") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            if !(0..16).contains(&n) {
                return Err(ScriptError::OutOfRange);
            }
            w.game.thor_info.inventory |= 1 << n;
            env.play_sound(Sound::Discovery, false);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ITEMTAKE") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            if !(0..16).contains(&n) {
                return Err(ScriptError::OutOfRange);
            }
            w.game.thor_info.inventory &= !(1 << n);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("ITEMSAY") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            if !(0..16).contains(&n) {
                return Err(ScriptError::OutOfRange);
            }
            env.show_say(ITEM_NAMES[n as usize], 0, DialogKind::Speech);
            return Ok(Flow::Pause);
        }
        if let Some(rest) = stmt.strip_prefix("SETFLAG") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            if !(0..64).contains(&n) {
                return Err(ScriptError::OutOfRange);
            }
            w.game.set_flag(n as usize, true);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("LTOA") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            expect(rest, &mut pos, b',')?;
            let rb = rest.as_bytes();
            if pos + 1 >= rb.len() || !rb[pos].is_ascii_uppercase() || rb[pos + 1] != b'$' {
                return Err(ScriptError::Syntax);
            }
            let var = (rb[pos] - b'A') as usize;
            self.str_var[var] = n.to_string();
            return Ok(Flow::Next);
        }
        if stmt == "PAUSE" {
            env.script_pause(20);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("TEXT") {
            let mut pos = 0;
            let text = self.calc_string(rest, &mut pos)?;
            env.show_say(&text, 0, DialogKind::Sign);
            return Ok(Flow::Pause);
        }
        if let Some(rest) = stmt.strip_prefix("EXEC") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            w.game.exec_event = Some(n);
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("VISIBLE") {
            let mut pos = 0;
            let n = self.calc_value(rest, &mut pos, w)?;
            if !(0..MAX_ACTORS as i32).contains(&n) {
                return Err(ScriptError::OutOfRange);
            }
            w.update_actor(n as usize, |a| {
                a.active = true;
                a.solid &= !SOLID_INTANGIBLE;
            });
            return Ok(Flow::Next);
        }
        if let Some(rest) = stmt.strip_prefix("RANDOM") {
            let rb = rest.as_bytes();
            if rb.is_empty() || !rb[0].is_ascii_uppercase() {
                return Err(ScriptError::Syntax);
            }
            let var = (rb[0] - b'A') as usize;
            let mut pos = 1;
            expect(rest, &mut pos, b',')?;
            let n = self.calc_value(rest, &mut pos, w)?;
            if n <= 0 {
                return Err(ScriptError::OutOfRange);
            }
            self.num_var[var] = w.rnd.rand(n - 1);
            return Ok(Flow::Next);
        }

        Err(ScriptError::Syntax)
    }

    fn cmd_for(&mut self, rest: &str, next: usize, w: &mut World) -> Result<Flow, ScriptError> {
        let b = rest.as_bytes();
        if b.len() < 2 || !b[0].is_ascii_uppercase() || b[1] != b'=' {
            return Err(ScriptError::Syntax);
        }
        if self.for_stack.len() >= MAX_FOR {
            return Err(ScriptError::Nesting);
        }
        let var = (b[0] - b'A') as usize;
        let mut pos = 2;
        let start = self.calc_value(rest, &mut pos, w)?;
        if !rest[pos..].starts_with("TO") {
            return Err(ScriptError::Syntax);
        }
        pos += 2;
        let limit = self.calc_value(rest, &mut pos, w)?;
        self.num_var[var] = start;
        self.for_stack.push(ForLoop {
            var,
            limit,
            resume: next,
        });
        Ok(Flow::Next)
    }

    fn cmd_if(
        &mut self,
        rest: &str,
        next: usize,
        w: &mut World,
        env: &mut dyn GotEnv,
    ) -> Result<Flow, ScriptError> {
        let mut pos = 0;
        let lhs = self.calc_value(rest, &mut pos, w)?;
        let b = rest.as_bytes();
        let op = match (b.get(pos), b.get(pos + 1)) {
            (Some(b'<'), Some(b'>')) => {
                pos += 2;
                "<>"
            }
            (Some(b'<'), Some(b'=')) => {
                pos += 2;
                "<="
            }
            (Some(b'>'), Some(b'=')) => {
                pos += 2;
                ">="
            }
            (Some(b'<'), _) => {
                pos += 1;
                "<"
            }
            (Some(b'>'), _) => {
                pos += 1;
                ">"
            }
            (Some(b'='), _) => {
                pos += 1;
                "="
            }
            _ => return Err(ScriptError::Syntax),
        };
        let rhs = self.calc_value(rest, &mut pos, w)?;
        if !rest[pos..].starts_with("THEN") {
            return Err(ScriptError::Syntax);
        }
        let body = &rest[pos + 4..];
        let cond = match op {
            "=" => lhs == rhs,
            "<>" => lhs != rhs,
            "<" => lhs < rhs,
            ">" => lhs > rhs,
            "<=" => lhs <= rhs,
            _ => lhs >= rhs,
        };
        if cond {
            let body = body.to_string();
            return self.exec_entry(&body, next, w, env);
        }
        Ok(Flow::SkipToElse)
    }

    fn cmd_say(
        &mut self,
        rest: &str,
        w: &mut World,
        env: &mut dyn GotEnv,
    ) -> Result<Flow, ScriptError> {
        let mut pos = 0;
        let mut icon = 0u8;
        // optional leading speaker icon number
        if rest.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            let n = self.calc_value(rest, &mut pos, w)?;
            expect(rest, &mut pos, b',')?;
            if !(0..=255).contains(&n) {
                return Err(ScriptError::OutOfRange);
            }
            icon = n as u8;
        }
        let text = self.calc_string(rest, &mut pos)?;
        env.show_say(&text, icon, DialogKind::Speech);
        Ok(Flow::Pause)
    }

    fn cmd_ask(&mut self, rest: &str, env: &mut dyn GotEnv) -> Result<Flow, ScriptError> {
        let b = rest.as_bytes();
        if b.is_empty() || !b[0].is_ascii_uppercase() {
            return Err(ScriptError::Syntax);
        }
        self.ask_var = (b[0] - b'A') as usize;
        let mut pos = 1;
        expect(rest, &mut pos, b',')?;
        let title = self.calc_string(rest, &mut pos)?;
        let mut options = Vec::new();
        while pos < b.len() && b[pos] == b',' {
            pos += 1;
            options.push(self.calc_string(rest, &mut pos)?);
        }
        if options.is_empty() {
            return Err(ScriptError::Syntax);
        }
        env.show_ask(&title, &options);
        Ok(Flow::Pause)
    }

    /*
    =========================================================================

                    EXPRESSIONS

    =========================================================================
    */

    /// Left-to-right arithmetic with no precedence: 2+3*4 is 20. Stops at
    /// the first byte that is neither an operand nor + - * /.
    fn calc_value(&mut self, s: &str, pos: &mut usize, w: &mut World) -> Result<i32, ScriptError> {
        let mut acc = self.operand(s, pos, w)?;
        let b = s.as_bytes();
        while let Some(&op) = b.get(*pos) {
            if op != b'+' && op != b'-' && op != b'*' && op != b'/' {
                break;
            }
            *pos += 1;
            let rhs = self.operand(s, pos, w)?;
            acc = match op {
                b'+' => acc.wrapping_add(rhs),
                b'-' => acc.wrapping_sub(rhs),
                b'*' => acc.wrapping_mul(rhs),
                _ => {
                    if rhs == 0 {
                        return Err(ScriptError::OutOfRange);
                    }
                    acc / rhs
                }
            };
        }
        Ok(acc)
    }

    fn operand(&mut self, s: &str, pos: &mut usize, w: &mut World) -> Result<i32, ScriptError> {
        let b = s.as_bytes();
        match b.get(*pos) {
            Some(b'-') => {
                *pos += 1;
                Ok(-self.operand(s, pos, w)?)
            }
            Some(b'@') => {
                // internal variable; @FLAG evaluates the remainder of the
                // expression to pick which of the 64 flags to read
                *pos += 1;
                let start = *pos;
                while b.get(*pos).is_some_and(|d| d.is_ascii_uppercase()) {
                    *pos += 1;
                }
                let name = s[start..*pos].to_string();
                if name == "FLAG" {
                    let n = self.calc_value(s, pos, w)?;
                    if !(0..64).contains(&n) {
                        return Err(ScriptError::OutOfRange);
                    }
                    return Ok(w.game.flag(n as usize) as i32);
                }
                self.internal_var(&name, w)
            }
            Some(c) if c.is_ascii_digit() => {
                let start = *pos;
                while b.get(*pos).is_some_and(|d| d.is_ascii_digit()) {
                    *pos += 1;
                }
                s[start..*pos].parse().map_err(|_| ScriptError::OutOfRange)
            }
            Some(c) if c.is_ascii_uppercase() => {
                *pos += 1;
                Ok(self.num_var[(c - b'A') as usize])
            }
            _ => Err(ScriptError::Syntax),
        }
    }

    /// Read-only state bridged into expressions by name.
    fn internal_var(&mut self, name: &str, w: &mut World) -> Result<i32, ScriptError> {
        let t = *w.thor();
        Ok(match name {
            "JEWELS" => w.game.thor_info.jewels,
            "HEALTH" => t.health,
            "MAGIC" => w.game.thor_info.magic,
            "KEYS" => w.game.thor_info.keys,
            "SCORE" => w.game.thor_info.score,
            "SCREEN" => w.game.current_area as i32,
            "THORX" => t.x,
            "THORY" => t.y,
            "THORDIR" => t.dir.index() as i32,
            "THORTILE" => w.screen.bgtile(t.center_x(), t.center_y()) as i32,
            "THORPOS" => {
                crate::level::Screen::cell_of(t.center_x(), t.center_y()).unwrap_or(0) as i32
            }
            "INV" => w.game.thor_info.inventory as i32,
            "ITEM" => w.game.thor_info.selected_item as i32,
            "OBJECT" => {
                let cell =
                    crate::level::Screen::cell_of(t.center_x(), t.center_y()).unwrap_or(0);
                w.screen.object_map[cell] as i32
            }
            "RAND" => w.rnd.rand(99),
            "BOSSDEAD" => (w.game.boss_dead >= 2) as i32,
            _ => return Err(ScriptError::Syntax),
        })
    }

    /// String expression: quoted literals and X$ variables joined by `+`,
    /// truncated to the interpreter's string cap. The scan stops at the
    /// first byte that continues neither, leaving commas for the caller.
    fn calc_string(&mut self, s: &str, pos: &mut usize) -> Result<String, ScriptError> {
        let b = s.as_bytes();
        let mut out = String::new();
        loop {
            match b.get(*pos) {
                Some(b'"') => {
                    *pos += 1;
                    let start = *pos;
                    while b.get(*pos).is_some_and(|&c| c != b'"') {
                        *pos += 1;
                    }
                    if b.get(*pos).is_none() {
                        return Err(ScriptError::Syntax);
                    }
                    out.push_str(&s[start..*pos]);
                    *pos += 1;
                }
                Some(c) if c.is_ascii_uppercase() && b.get(*pos + 1) == Some(&b'$') => {
                    let var = (c - b'A') as usize;
                    out.push_str(&self.str_var[var]);
                    *pos += 2;
                }
                _ => return Err(ScriptError::Syntax),
            }
            match b.get(*pos) {
                Some(b'+') => *pos += 1,
                _ => break,
            }
        }
        out.truncate(MAX_STR);
        Ok(out)
    }
}

fn expect(s: &str, pos: &mut usize, want: u8) -> Result<(), ScriptError> {
    if s.as_bytes().get(*pos) == Some(&want) {
        *pos += 1;
        Ok(())
    } else {
        Err(ScriptError::Syntax)
    }
}

fn split_outside_quotes(s: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    for ch in s.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            cur.push(ch);
        } else if ch == sep && !in_quotes {
            out.push(std::mem::take(&mut cur));
        } else {
            cur.push(ch);
        }
    }
    out.push(cur);
    out
}
