use std::{cell::Cell, fs, path::Path};

use log::{debug, warn};

use crate::{
    runtime::{
        error::{Result, RuntimeError},
        expr::Expr,
        tower::Value,
        units::{
            builtin_units::BUILTIN_UNITS,
            prefixes::{PREFIXES, Prefix, splits},
        },
    },
    syntax::{parse_exact_number, parse_unit_expression},
};

/// One row of the unit table: `1 name = factor * base`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub name: String,
    pub factor: Value,
    pub base: Expr,
    pub category: String,
}

impl UnitDef {
    /// Base units are defined in terms of themselves.
    pub fn is_base(&self) -> bool {
        matches!(&self.base, Expr::Symbol(name) if *name == self.name)
    }
}

/// A unit name resolved against the table.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub def: &'a UnitDef,
    pub prefix: Option<&'static Prefix>,
}

/// Ordered unit definitions with a one-entry lookup cache.
///
/// Lookups scan the rows in order, so earlier rows shadow later ones: custom
/// definitions are placed ahead of the built-in ones.
#[derive(Debug, Clone)]
pub struct UnitTable {
    defs: Vec<UnitDef>,
    /// Last hit as (row, prefix index).
    recent: Cell<Option<(usize, Option<usize>)>>,
}

impl UnitTable {
    pub fn empty() -> Self {
        Self {
            defs: Vec::new(),
            recent: Cell::new(None),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.defs = parse_rows(BUILTIN_UNITS, "builtin");
        table
    }

    /// Built-in table with the rows of a user unit file in front.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut table = Self::builtin();
        table.prepend_csv(&text, &path.display().to_string());
        Ok(table)
    }

    /// Adds rows ahead of the existing ones. Malformed lines are skipped.
    pub fn prepend_csv(&mut self, text: &str, source: &str) -> usize {
        let rows = parse_rows(text, source);
        let count = rows.len();
        self.defs.splice(0..0, rows);
        self.recent.set(None);
        debug!("loaded {} unit definitions from {}", count, source);
        count
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitDef> {
        self.defs.iter()
    }

    fn exact(&self, name: &str) -> Option<usize> {
        self.defs.iter().position(|def| def.name == name)
    }

    /// Resolves a unit name: an exact row first, then the longest prefix
    /// whose remainder names a row.
    pub fn lookup(&self, name: &str) -> Option<Resolved<'_>> {
        if let Some((row, prefix)) = self.recent.get() {
            let def = &self.defs[row];
            let prefix = prefix.map(|p| &PREFIXES[p]);
            let spelled = match prefix {
                Some(p) => name.strip_prefix(p.symbol) == Some(def.name.as_str()),
                None => def.name == name,
            };
            if spelled {
                return Some(Resolved { def, prefix });
            }
        }

        if let Some(row) = self.exact(name) {
            self.recent.set(Some((row, None)));
            return Some(Resolved {
                def: &self.defs[row],
                prefix: None,
            });
        }
        for (prefix, rest) in splits(name) {
            if let Some(row) = self.exact(rest) {
                let index = PREFIXES
                    .iter()
                    .position(|p| std::ptr::eq(p, prefix));
                self.recent.set(Some((row, index)));
                return Some(Resolved {
                    def: &self.defs[row],
                    prefix: Some(prefix),
                });
            }
        }
        None
    }

    /// Fails with `UndefinedUnit` on the first symbol that does not resolve.
    pub fn validate(&self, unit: &Expr) -> Result<()> {
        match unit.symbols().into_iter().find(|name| self.lookup(name).is_none()) {
            Some(name) => Err(RuntimeError::UndefinedUnit(name.to_string())),
            None => Ok(()),
        }
    }

    /// Rows sharing `category`, in table order, without shadowed duplicates.
    pub fn category(&self, category: &str) -> Vec<&UnitDef> {
        let mut out: Vec<&UnitDef> = Vec::new();
        for def in self.defs.iter().filter(|def| def.category == category) {
            if !out.iter().any(|seen| seen.name == def.name) {
                out.push(def);
            }
        }
        out
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn parse_rows(text: &str, source: &str) -> Vec<UnitDef> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            match parse_row(line) {
                Ok(def) => Some(def),
                Err(reason) => {
                    warn!("{}:{}: skipping unit definition: {}", source, index + 1, reason);
                    None
                }
            }
        })
        .collect()
}

fn parse_row(line: &str) -> std::result::Result<UnitDef, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [name, base, factor, rest @ ..] = fields.as_slice() else {
        return Err("expected `name, base, factor[, category]`".into());
    };
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == 'µ') {
        return Err(format!("bad unit name `{}`", name));
    }
    let factor = parse_exact_number(factor).ok_or_else(|| format!("bad factor `{}`", factor))?;
    if factor.is_zero() || factor.is_negative() {
        return Err(format!("factor of `{}` must be positive", name));
    }
    let base = parse_unit_expression(base).map_err(|err| err.message())?;
    Ok(UnitDef {
        name: name.to_string(),
        factor,
        base,
        category: rest.first().copied().unwrap_or("").to_string(),
    })
}
