use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Gnome Sort](https://en.wikipedia.org/wiki/Gnome_sort)
///
/// A single position walks through the array. When the pair behind it is in order it steps
/// forward; otherwise it exchanges the pair and steps back one.
#[derive(Default, Debug, Clone, Copy)]
pub struct GnomeSorter;

async fn gnome_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();
    let mut pos = 1;

    while pos < n {
        s.checkpoint()?;

        if s.compare(pos, pos - 1).await? == Ordering::Less {
            s.exchange(pos, pos - 1).await?;
            pos = (pos - 1).max(1);
        } else {
            pos += 1;
        }
    }

    Ok(())
}

impl StepSorter for GnomeSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        gnome_sort(stepper).boxed()
    }
}
