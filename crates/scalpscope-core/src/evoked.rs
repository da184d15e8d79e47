//! Time-locked multi-channel EEG data
//!
//! [`Evoked`] couples a channels x samples matrix with its channel info and
//! montage-resolved sensor positions. Cursor lookups are pure reads: the
//! timeline is never shifted in place, so one evoked container can serve
//! any number of renders.

use crate::error::SessionError;
use crate::montage::Montage;
use crate::types::ChannelInfo;

/// Fixed pre-stimulus anchor: the first sample sits 0.1 s before the
/// stimulus onset.
pub const PRESTIM_OFFSET_S: f64 = 0.1;

/// Time-locked, montage-positioned channel data.
#[derive(Debug, Clone, PartialEq)]
pub struct Evoked {
    data: Vec<f64>,
    n_channels: usize,
    n_times: usize,
    info: ChannelInfo,
    positions: Vec<[f64; 2]>,
    tmin: f64,
}

impl Evoked {
    /// Build an evoked container from a flattened channels-major buffer.
    ///
    /// Every channel name in `info` must resolve to a position in
    /// `montage`.
    ///
    /// # Errors
    ///
    /// [`SessionError::DataLength`] when the buffer does not fill the
    /// stated shape, [`SessionError::EmptyData`] for a zero-sized shape,
    /// [`SessionError::ChannelCountMismatch`] when the shape disagrees with
    /// `info`, and a montage error for unresolvable channels.
    pub fn new(
        data: Vec<f64>,
        n_channels: usize,
        n_times: usize,
        info: ChannelInfo,
        montage: &Montage,
    ) -> Result<Self, SessionError> {
        if n_channels == 0 || n_times == 0 {
            return Err(SessionError::EmptyData);
        }
        if n_channels.checked_mul(n_times) != Some(data.len()) {
            return Err(SessionError::DataLength {
                len: data.len(),
                n_channels,
                n_times,
            });
        }
        if info.n_channels() != n_channels {
            return Err(SessionError::ChannelCountMismatch {
                expected: info.n_channels(),
                n_channels,
            });
        }

        let positions = info
            .ch_names
            .iter()
            .map(|name| {
                montage.project(name).ok_or_else(|| {
                    crate::error::MontageError::UnknownChannel {
                        name: name.clone(),
                        montage: montage.name().to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            data,
            n_channels,
            n_times,
            info,
            positions,
            tmin: -PRESTIM_OFFSET_S,
        })
    }

    /// Channel info the data was built against
    #[must_use]
    pub fn info(&self) -> &ChannelInfo {
        &self.info
    }

    /// Number of channels
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Samples per channel
    #[must_use]
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Time of the first sample relative to stimulus onset, in seconds
    #[must_use]
    pub fn tmin(&self) -> f64 {
        self.tmin
    }

    /// Unit-disk sensor position per channel, in channel order
    #[must_use]
    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// One channel's samples
    #[must_use]
    pub fn channel(&self, index: usize) -> &[f64] {
        &self.data[index * self.n_times..(index + 1) * self.n_times]
    }

    /// Sample index nearest to `cursor_time` seconds from recording start,
    /// clamped into range.
    #[must_use]
    pub fn index_at(&self, cursor_time: f64) -> usize {
        let idx = (cursor_time * self.info.sfreq).round();
        idx.clamp(0.0, (self.n_times - 1) as f64) as usize
    }

    /// Per-channel values at the cursor position.
    #[must_use]
    pub fn values_at(&self, cursor_time: f64) -> Vec<f64> {
        let idx = self.index_at(cursor_time);
        (0..self.n_channels).map(|ch| self.channel(ch)[idx]).collect()
    }

    /// Per-channel mean over the `window_s`-wide interval centered on the
    /// cursor position, clamped at the recording edges.
    #[must_use]
    pub fn average_around(&self, cursor_time: f64, window_s: f64) -> Vec<f64> {
        let half = window_s.abs() / 2.0;
        let lo = self.index_at(cursor_time - half);
        let hi = self.index_at(cursor_time + half);
        let count = (hi - lo + 1) as f64;
        (0..self.n_channels)
            .map(|ch| self.channel(ch)[lo..=hi].iter().sum::<f64>() / count)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::montage::Montage;

    fn montage() -> Montage {
        Montage::standard("standard_1020").unwrap()
    }

    fn info() -> ChannelInfo {
        ChannelInfo::eeg(vec!["Fp1".into(), "Cz".into(), "O2".into()], 256.0)
    }

    fn ramp_evoked() -> Evoked {
        // Channel ch sample i holds ch * 1000 + i.
        let mut data = Vec::with_capacity(3 * 256);
        for ch in 0..3 {
            data.extend((0..256).map(|i| f64::from(ch * 1000 + i)));
        }
        Evoked::new(data, 3, 256, info(), &montage()).unwrap()
    }

    #[test]
    fn test_cursor_selects_nearest_sample() {
        let evoked = ramp_evoked();
        assert_eq!(evoked.index_at(0.5), 128);
        assert_eq!(evoked.values_at(0.5), vec![128.0, 1128.0, 2128.0]);
    }

    #[test]
    fn test_cursor_clamps_to_recording() {
        let evoked = ramp_evoked();
        assert_eq!(evoked.index_at(-1.0), 0);
        assert_eq!(evoked.index_at(10.0), 255);
    }

    #[test]
    fn test_average_window_is_centered() {
        let evoked = ramp_evoked();
        // 0.5 s +/- 0.05 s at 256 Hz covers samples 115..=141.
        let avg = evoked.average_around(0.5, 0.1);
        let expected = (115..=141).sum::<i64>() as f64 / 27.0;
        assert!((avg[0] - expected).abs() < 1e-9);
        assert!((avg[1] - (1000.0 + expected)).abs() < 1e-9);
    }

    #[test]
    fn test_average_clamps_at_edges() {
        let evoked = ramp_evoked();
        let avg = evoked.average_around(0.0, 0.1);
        // Left half of the window is clamped away: samples 0..=13.
        let expected = (0..=13).sum::<i64>() as f64 / 14.0;
        assert!((avg[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_prestim_anchor() {
        let evoked = ramp_evoked();
        assert!((evoked.tmin() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_shape_validation() {
        assert!(matches!(
            Evoked::new(vec![0.0; 10], 3, 4, info(), &montage()),
            Err(SessionError::DataLength { .. })
        ));
        assert!(matches!(
            Evoked::new(vec![], 0, 0, info(), &montage()),
            Err(SessionError::EmptyData)
        ));
        let two = ChannelInfo::eeg(vec!["Fp1".into(), "Cz".into()], 256.0);
        assert!(matches!(
            Evoked::new(vec![0.0; 3 * 4], 3, 4, two, &montage()),
            Err(SessionError::ChannelCountMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let bad = ChannelInfo::eeg(vec!["Fp1".into(), "XX9".into()], 256.0);
        let err = Evoked::new(vec![0.0; 2 * 4], 2, 4, bad, &montage()).unwrap_err();
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("XX9"));
    }
}
