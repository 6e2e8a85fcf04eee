use crate::runtime::{
    error::{Result, RuntimeError},
    tower::Value,
    vm::Runtime,
};

impl Runtime {
    pub(crate) fn op_dup(&mut self) -> Result<()> {
        self.require(1)?;
        let top = self.stack[self.stack.len() - 1].clone();
        self.stack.push(top);
        Ok(())
    }

    pub(crate) fn op_drop(&mut self) -> Result<()> {
        self.require(1)?;
        self.stack.pop();
        Ok(())
    }

    pub(crate) fn op_swap(&mut self) -> Result<()> {
        self.require(2)?;
        let n = self.stack.len();
        self.stack.swap(n - 1, n - 2);
        Ok(())
    }

    pub(crate) fn op_over(&mut self) -> Result<()> {
        self.require(2)?;
        let second = self.stack[self.stack.len() - 2].clone();
        self.stack.push(second);
        Ok(())
    }

    /// Moves level 3 to level 1.
    pub(crate) fn op_rot(&mut self) -> Result<()> {
        self.require(3)?;
        let n = self.stack.len();
        self.stack[n - 3..].rotate_left(1);
        Ok(())
    }

    pub(crate) fn op_clear(&mut self) -> Result<()> {
        self.stack.clear();
        Ok(())
    }

    pub(crate) fn op_depth(&mut self) -> Result<()> {
        let depth = i64::try_from(self.stack.len()).unwrap_or(i64::MAX);
        self.push(&Value::Integer(depth))
    }

    /// `PREC`: sets the working precision from an integer on level 1.
    pub(crate) fn op_prec(&mut self) -> Result<()> {
        let value = self.pop()?;
        let digits = match value {
            Value::Integer(d) => usize::try_from(d).ok(),
            _ => None,
        }
        .ok_or_else(|| {
            RuntimeError::BadArgumentValue(format!("precision must be a positive integer, not {}", value))
        })?;
        self.set_precision(digits)
    }
}
