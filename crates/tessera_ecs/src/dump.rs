use crate::manager::Manager;
use std::fmt::{self, Write};

/// Read-only snapshot of the manager's table state, for console and log
/// output. Formatting walks the table but never mutates it.
pub struct StateDump<'a> {
    manager: &'a Manager,
}

impl Manager {
    pub fn state_dump(&self) -> StateDump<'_> {
        StateDump { manager: self }
    }
}

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.manager.entities();
        let schema = self.manager.schema();
        write!(f, "kinds:    ")?;
        for kind in 0..schema.component_count() {
            if kind > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", schema.component_name(kind))?;
        }
        writeln!(f)?;
        writeln!(f, "capacity: {}", table.capacity())?;
        writeln!(f, "live:     {}", table.size())?;
        writeln!(f, "next:     {}", table.attempt_count())?;

        // One character per allocated position: `A` alive, `.` dead.
        write!(f, "map:      ")?;
        for position in 0..table.capacity() {
            f.write_char(if table.record_at(position).alive {
                'A'
            } else {
                '.'
            })?;
        }
        writeln!(f)
    }
}
