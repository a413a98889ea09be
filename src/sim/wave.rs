//! Wave segmentation
//!
//! A wave is a contiguous slice of a pattern's bullet vector with its own age.
//! Wave *i* covers the bullets after the first `sizes[0..i].sum()` entries.
//! Bullets spawned across several frames are counted into an open wave that
//! is closed by `add_wave(0, ..)`.
//!
//! Invariant: `sizes.sum() + open == bullets.len()`.

use std::ops::Range;

use super::bullet::Bullet;
use super::pattern::PatternCore;

/// Per-wave remaining counts and ages, kept parallel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveBook {
    /// Remaining bullets per closed wave
    sizes: Vec<usize>,
    /// Frames each closed wave has existed
    ages: Vec<u32>,
    /// Bullets spawned since the last closed wave
    open: usize,
}

impl WaveBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of closed waves
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn ages(&self) -> &[u32] {
        &self.ages
    }

    /// Age of a closed wave, or `None` (logged) past the last wave
    pub fn age(&self, wave: usize) -> Option<u32> {
        match self.ages.get(wave) {
            Some(&age) => Some(age),
            None => self.out_of_range(wave),
        }
    }

    /// Bullets counted towards the wave still being built
    #[inline]
    pub fn open_count(&self) -> usize {
        self.open
    }

    /// Every bullet the ledger knows about
    pub fn tracked_count(&self) -> usize {
        self.sizes.iter().sum::<usize>() + self.open
    }

    /// Call once per bullet when a wave is built over several frames
    pub fn increment_current_bullet_count(&mut self) {
        self.open += 1;
    }

    /// Close a wave.
    ///
    /// With `count == 0` the open wave is closed (and nothing happens if it is
    /// empty); otherwise the last `count` bullets form the new wave.
    pub fn add_wave(&mut self, count: usize, entity_count: usize) {
        if count == 0 {
            if self.open == 0 {
                return;
            }
            self.sizes.push(self.open);
            self.open = 0;
        } else {
            self.sizes.push(count);
        }
        self.ages.push(0);
        log::debug!(
            "Wave {} closed with {} bullets",
            self.sizes.len() - 1,
            self.sizes[self.sizes.len() - 1]
        );
        self.check_valid_waves(entity_count);
    }

    /// Register a wave for bullets just inserted at the front of the vector
    pub fn insert_leading_wave(&mut self, count: usize, entity_count: usize) {
        if count == 0 {
            return;
        }
        self.sizes.insert(0, count);
        self.ages.insert(0, 0);
        self.check_valid_waves(entity_count);
    }

    /// Compare the ledger against the real bullet count.
    ///
    /// A mismatch is a logic bug: logged, and fatal in debug builds.
    pub fn check_valid_waves(&self, entity_count: usize) -> bool {
        let tracked = self.tracked_count();
        if tracked != entity_count {
            log::error!(
                "Wave mismatch: {} bullets, {} tracked ({} open)",
                entity_count,
                tracked,
                self.open
            );
            debug_assert!(false, "wave mismatch: {entity_count} bullets vs {tracked} tracked");
            return false;
        }
        true
    }

    /// Index of the first bullet in a wave
    pub fn start_index(&self, wave: usize) -> Option<usize> {
        if wave >= self.sizes.len() {
            return self.out_of_range(wave);
        }
        Some(self.sizes[..wave].iter().sum())
    }

    /// Index of the last bullet in a wave (inclusive)
    pub fn end_index(&self, wave: usize) -> Option<usize> {
        self.range(wave).map(|r| r.end - 1)
    }

    pub fn range(&self, wave: usize) -> Option<Range<usize>> {
        let start = self.start_index(wave)?;
        Some(start..start + self.sizes[wave])
    }

    fn out_of_range<T>(&self, wave: usize) -> Option<T> {
        log::error!("Wave {} requested but only {} exist", wave, self.sizes.len());
        None
    }

    /// (bullet range, age) for each closed wave, in order
    pub fn spans(&self) -> impl Iterator<Item = (Range<usize>, u32)> + '_ {
        let mut start = 0;
        self.sizes.iter().zip(&self.ages).map(move |(&size, &age)| {
            let range = start..start + size;
            start += size;
            (range, age)
        })
    }

    /// Age every wave by one frame
    pub fn increment_wave_frames(&mut self) {
        for age in &mut self.ages {
            *age += 1;
        }
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
        self.ages.clear();
        self.open = 0;
    }

    /// Cull out-of-bounds bullets and keep the ledger in step.
    ///
    /// Bullets for which `exempt` returns true are never culled.
    pub fn delete_out_of_bounds_bullets<F>(&mut self, core: &mut PatternCore, exempt: F)
    where
        F: Fn(&Bullet) -> bool,
    {
        let doomed: Vec<bool> = core
            .bullets
            .iter()
            .map(|b| !exempt(b) && core.is_out_of_bounds(b))
            .collect();
        if !doomed.contains(&true) {
            return;
        }

        // Attribute each doomed bullet to its wave using original indices
        let mut removed = vec![0usize; self.sizes.len()];
        let mut removed_open = 0usize;
        let mut wave = 0;
        let mut wave_end = self.sizes.first().copied().unwrap_or(0);
        for (index, &gone) in doomed.iter().enumerate() {
            while wave < self.sizes.len() && index >= wave_end {
                wave += 1;
                wave_end += self.sizes.get(wave).copied().unwrap_or(0);
            }
            if !gone {
                continue;
            }
            if wave < self.sizes.len() {
                removed[wave] += 1;
            } else {
                removed_open += 1;
            }
        }

        let mut index = 0;
        core.bullets.retain(|_| {
            let keep = !doomed[index];
            index += 1;
            keep
        });

        // Back to front so removals don't shift unvisited waves
        for wave in (0..self.sizes.len()).rev() {
            self.sizes[wave] -= removed[wave];
            if self.sizes[wave] == 0 {
                self.sizes.remove(wave);
                self.ages.remove(wave);
            }
        }
        if removed_open > self.open {
            log::error!(
                "Culled {} untracked bullets but only {} are open",
                removed_open,
                self.open
            );
        }
        self.open = self.open.saturating_sub(removed_open);
        self.check_valid_waves(core.bullets.len());
    }
}
