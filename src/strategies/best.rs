//! The `BEST` placement strategy.
//!
// Despite its name this strategy does not pick the tightest gap. It walks the
// whole list, considers only gaps strictly longer than the request, and keeps
// the longest of those (first one wins on ties). A gap exactly as long as the
// request is never chosen. The reports this simulator reproduces were produced
// with exactly this rule, so it must not be "fixed" here; a real best-fit would
// be a separate strategy with its own name.

use tracing::{debug, instrument, Level};

use super::{Placement, Selection};
use crate::freelist::FreeList;
use crate::gap::Gap;

/// Worst-fit among gaps strictly longer than the request, registered as `BEST`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Best;

impl Best {
    pub const NAME: &'static str = "BEST";
}

impl Placement for Best {
    fn name(&self) -> &'static str {
        Best::NAME
    }

    #[instrument(level = "debug", skip(self, free_list), ret(level = Level::DEBUG))]
    fn select(&mut self, free_list: &FreeList, size: usize) -> Selection {
        let mut candidate: Option<Gap> = None;
        let mut visited = 0;

        for &gap in free_list.entries() {
            visited += 1;
            if gap.length <= size {
                continue;
            }
            match candidate {
                Some(c) if gap.length <= c.length => {}
                _ => {
                    debug!(%gap, "New candidate.");
                    candidate = Some(gap);
                }
            }
        }

        Selection { gap: candidate, visited }
    }
}
