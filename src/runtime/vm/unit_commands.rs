use crate::runtime::{error::Result, units::commands, vm::Runtime};

impl Runtime {
    pub(crate) fn op_convert(&mut self) -> Result<()> {
        self.apply_values(2, |args, ctx| commands::convert_to(&args[0], &args[1], ctx))
    }

    pub(crate) fn op_ubase(&mut self) -> Result<()> {
        self.apply_values(1, |args, ctx| commands::to_base(&args[0], ctx))
    }

    pub(crate) fn op_ufact(&mut self) -> Result<()> {
        self.apply_values(2, |args, ctx| commands::factor(&args[0], &args[1], ctx))
    }

    pub(crate) fn op_uval(&mut self) -> Result<()> {
        self.apply_values(1, |args, _| commands::value_of(&args[0]))
    }

    pub(crate) fn op_to_unit(&mut self) -> Result<()> {
        self.apply_values(2, |args, _| commands::attach(&args[0], &args[1]))
    }

    pub(crate) fn op_cycle(&mut self) -> Result<()> {
        self.apply_values(1, |args, ctx| commands::cycle(&args[0], ctx))
    }

    pub(crate) fn op_to_prefix(&mut self) -> Result<()> {
        self.apply_values(2, |args, ctx| commands::to_prefix(&args[0], &args[1], ctx))
    }
}
