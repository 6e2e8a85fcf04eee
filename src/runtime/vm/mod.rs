//! The command loop: an RPL stack of heap handles plus the context every
//! command runs in.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, trace};

use crate::runtime::{
    arithmetic::{EvalContext, check_limits},
    config::RuntimeConfig,
    error::{Result, RuntimeError},
    gc::{CollectStats, GcHeap, Handle},
    screen::Screen,
    tower::Value,
    units::UnitTable,
};

pub mod commands;
pub mod keys;
mod program;
mod stack_ops;
mod trace;
mod unit_commands;


pub use keys::{Key, KeyState};

/// Calculator runtime.
///
/// Owns the heap, the stack and all mutable settings. Every command is
/// atomic: on failure the stack is put back exactly as it was when the
/// command started.
pub struct Runtime {
    heap: GcHeap,
    /// Level 1 is the last element.
    stack: Vec<Handle>,
    config: RuntimeConfig,
    units: UnitTable,
    keys: KeyState,
    interrupt: Arc<AtomicBool>,
    screen: Screen,
    trace: bool,
    eval_depth: usize,
    last_error: Option<RuntimeError>,
}

/// Nesting limit for `EVAL` of programs that evaluate programs.
const MAX_EVAL_DEPTH: usize = 64;

impl Runtime {
    /// Validates `config` and loads the unit table it names.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let units = match &config.units_file {
            Some(path) => UnitTable::load(path)?,
            None => UnitTable::builtin(),
        };
        Ok(Self::with_units(config, units))
    }

    pub fn with_units(config: RuntimeConfig, units: UnitTable) -> Self {
        let mut heap = GcHeap::with_capacity(config.heap_bytes);
        heap.set_limits(config.payload_limits());
        heap.set_enabled(config.gc_enabled);
        debug!(
            "runtime: {} heap bytes, {} digits, {} units",
            heap.capacity(),
            config.precision,
            units.len()
        );
        Self {
            heap,
            stack: Vec::new(),
            config,
            units,
            keys: KeyState::default(),
            interrupt: Arc::new(AtomicBool::new(false)),
            screen: Screen::new(),
            trace: false,
            eval_depth: 0,
            last_error: None,
        }
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_gc_enabled(&mut self, enabled: bool) {
        self.config.gc_enabled = enabled;
        self.heap.set_enabled(enabled);
    }

    pub fn set_unit_mode(&mut self, enabled: bool) {
        self.config.unit_mode = enabled;
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn heap(&self) -> &GcHeap {
        &self.heap
    }

    pub fn precision(&self) -> usize {
        self.config.precision
    }

    pub fn set_precision(&mut self, digits: usize) -> Result<()> {
        self.config.set_precision(digits)?;
        self.heap.set_limits(self.config.payload_limits());
        debug!("precision set to {} digits", digits);
        Ok(())
    }

    /// Flag polled between program steps. Setting it from another thread
    /// aborts the running program with `Interrupted`.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    pub(crate) fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::Relaxed)
    }

    pub fn last_error(&self) -> Option<&RuntimeError> {
        self.last_error.as_ref()
    }

    /// Forces a full collection.
    pub fn collect(&mut self) -> CollectStats {
        self.heap.collect()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Stack contents, deepest level first.
    pub fn stack_values(&self) -> Vec<Value> {
        self.stack.iter().map(|h| self.heap.load(h)).collect()
    }

    /// Value at stack level `n`, where level 1 is the top.
    pub fn level(&self, n: usize) -> Option<Value> {
        let index = self.stack.len().checked_sub(n)?;
        self.stack.get(index).map(|h| self.heap.load(h))
    }

    /// Pushes a value after checking the representation limits.
    pub fn push(&mut self, value: &Value) -> Result<()> {
        let ctx = EvalContext::new(&self.config, &self.units);
        let value = check_limits(value.clone(), &ctx)?;
        let handle = self.heap.store(&value)?;
        self.stack.push(handle);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value> {
        let handle = self.stack.pop().ok_or(RuntimeError::StackUnderflow {
            needed: 1,
            depth: 0,
        })?;
        Ok(self.heap.load(&handle))
    }

    fn require(&self, needed: usize) -> Result<()> {
        if self.stack.len() < needed {
            return Err(RuntimeError::StackUnderflow {
                needed,
                depth: self.stack.len(),
            });
        }
        Ok(())
    }

    /// Top `n` values, deepest first.
    fn peek_values(&self, n: usize) -> Result<Vec<Value>> {
        self.require(n)?;
        Ok(self.stack[self.stack.len() - n..]
            .iter()
            .map(|h| self.heap.load(h))
            .collect())
    }

    /// Replaces the top `n` levels with `results`. The results are stored
    /// before anything is removed, so a failed allocation leaves the stack
    /// alone.
    fn replace_top(&mut self, n: usize, results: &[Value]) -> Result<()> {
        let handles = results
            .iter()
            .map(|value| self.heap.store(value))
            .collect::<Result<Vec<_>>>()?;
        self.stack.truncate(self.stack.len() - n);
        self.stack.extend(handles);
        Ok(())
    }

    /// Runs a command taking `arity` values and producing one.
    fn apply_values(
        &mut self,
        arity: usize,
        f: impl FnOnce(&[Value], &EvalContext<'_>) -> Result<Value>,
    ) -> Result<()> {
        let args = self.peek_values(arity)?;
        let ctx = EvalContext::new(&self.config, &self.units);
        let result = check_limits(f(&args, &ctx)?, &ctx)?;
        self.replace_top(arity, &[result])
    }

    /// Parses and runs one command line.
    ///
    /// Nothing runs if the line does not parse. Commands run in order and
    /// the first failing one stops the line; its own stack effect is undone
    /// but earlier commands keep theirs.
    pub fn execute(&mut self, text: &str) -> Result<()> {
        trace!("execute: {}", text);
        let result = self.execute_line(text);
        if let Err(err) = &result {
            debug!("command line failed: {}", err);
        }
        self.last_error = result.as_ref().err().cloned();
        result
    }

    fn execute_line(&mut self, text: &str) -> Result<()> {
        let objects = self.parse_line(text)?;
        for object in objects {
            match object {
                Value::Command(index) => self.run_command(index)?,
                other => self.push(&other)?,
            }
        }
        Ok(())
    }

    /// Runs one command atomically.
    pub fn run_command(&mut self, index: u16) -> Result<()> {
        let saved = self.stack.clone();
        self.eval_depth = 0;
        let result = self.dispatch(index);
        self.interrupt.store(false, Ordering::Relaxed);
        if result.is_err() {
            self.stack = saved;
        }
        if self.trace {
            self.trace_command(index, &result);
        }
        result
    }

    pub(crate) fn enter_eval(&mut self) -> Result<()> {
        if self.eval_depth >= MAX_EVAL_DEPTH {
            return Err(RuntimeError::BadArgumentValue(format!(
                "evaluation nested deeper than {} levels",
                MAX_EVAL_DEPTH
            )));
        }
        self.eval_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_eval(&mut self) {
        self.eval_depth = self.eval_depth.saturating_sub(1);
    }

    /// Redraws the screen from the current state.
    pub fn render_screen(&mut self) -> &Screen {
        let values = self.stack_values();
        let editor = self.keys.editor().map(str::to_string);
        self.screen
            .draw_state(&values, editor.as_deref(), self.last_error.as_ref(), &self.config);
        &self.screen
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }
}
