//! Editing commands.
//!
//! Every user action that changes the animation is one [`Command`]. Applying
//! a command never touches the input animation: it returns the next state or
//! the error that prevented it.

use crate::model::{Animation, EditResult};

/// A single state transition on an [`Animation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Flip one cell of a frame
    ToggleCell { frame: usize, cell: usize },
    /// Turn every cell of a frame off
    Clear(usize),
    /// Turn every cell of a frame on
    Fill(usize),
    /// Complement every cell of a frame
    Invert(usize),
    /// Append an empty frame
    AddFrame,
    /// Insert a copy of a frame right after it
    DuplicateFrame(usize),
    /// Remove a frame (or clear it if it is the only one)
    DeleteFrame(usize),
    /// Advance to the next frame, wrapping around
    NextFrame,
    /// Step back to the previous frame, wrapping around
    PrevFrame,
    /// Make a frame current
    SelectFrame(usize),
    /// Give a frame a new name
    RenameFrame { frame: usize, name: String },
}

impl Command {
    /// Computes the animation that results from this command.
    pub fn apply(&self, animation: &Animation) -> EditResult<Animation> {
        let mut next = animation.clone();
        match self {
            Command::ToggleCell { frame, cell } => next.toggle_cell(*frame, *cell)?,
            Command::Clear(frame) => next.clear(*frame)?,
            Command::Fill(frame) => next.fill(*frame)?,
            Command::Invert(frame) => next.invert(*frame)?,
            Command::AddFrame => next.add_frame(),
            Command::DuplicateFrame(frame) => next.duplicate_frame(*frame)?,
            Command::DeleteFrame(frame) => next.delete_frame(*frame)?,
            Command::NextFrame => next.next_frame(),
            Command::PrevFrame => next.prev_frame(),
            Command::SelectFrame(frame) => next.set_current(*frame)?,
            Command::RenameFrame { frame, name } => next.rename_frame(*frame, name)?,
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EditError, CELLS};

    #[test]
    fn test_apply_leaves_input_untouched() {
        let anim = Animation::new();
        let next = Command::Fill(0).apply(&anim).unwrap();
        assert_eq!(anim.current_frame().lit_count(), 0);
        assert_eq!(next.current_frame().lit_count(), CELLS);
    }

    #[test]
    fn test_apply_error() {
        let anim = Animation::new();
        let err = Command::RenameFrame {
            frame: 0,
            name: "two words".to_string(),
        }
        .apply(&anim)
        .unwrap_err();
        assert_eq!(err, EditError::WhitespaceInName("two words".to_string()));
    }

    #[test]
    fn test_command_sequence() {
        let commands = [
            Command::ToggleCell { frame: 0, cell: 0 },
            Command::AddFrame,
            Command::DuplicateFrame(0),
            Command::Invert(2),
            Command::NextFrame,
            Command::DeleteFrame(2),
        ];
        let anim = commands
            .iter()
            .try_fold(Animation::new(), |anim, cmd| cmd.apply(&anim))
            .unwrap();

        let names: Vec<&str> = anim.frames().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Frame_1", "Frame_1_copy"]);
        assert_eq!(anim.current(), 1);
    }

    #[test]
    fn test_delete_never_empties() {
        let mut anim = Animation::new();
        for _ in 0..5 {
            anim = Command::DeleteFrame(0).apply(&anim).unwrap();
        }
        assert_eq!(anim.frame_count(), 1);
    }
}
