//! Topomap session controller
//!
//! One [`TopomapController`] per client session. Required ordering is a
//! real state machine rather than ad hoc null checks: `set_montage` must
//! come before `set_channels`, which must come before `set_data`; only then
//! can [`TopomapController::render`] produce frames. Out-of-order calls
//! fail with the precondition kind they are missing, and leave the state as
//! it was.

use crate::error::{Precondition, SessionError};
use crate::evoked::Evoked;
use crate::montage::Montage;
use crate::render::{Colormap, ColorbarLayout, Frame, Rect, TopomapPainter};
use crate::types::{ChannelInfo, FrameSize, SeriesMode};

/// Pixel width reserved for the colorbar gutter on the main frame.
const COLORBAR_GUTTER: u32 = 48;
/// Propagation grid dimensions (3x3, nine offsets across the span).
const GRID_COLS: u32 = 3;
const GRID_ROWS: u32 = 3;

/// Session lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No montage yet
    Uninitialized,
    /// Montage chosen
    MontageSet,
    /// Montage and channel info present
    ChannelsSet,
    /// Evoked data present; rendering is possible
    DataSet,
}

enum State {
    Uninitialized,
    MontageSet {
        montage: Montage,
    },
    ChannelsSet {
        montage: Montage,
        info: ChannelInfo,
    },
    DataSet {
        montage: Montage,
        info: ChannelInfo,
        evoked: Evoked,
    },
}

/// Parameters of one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawParams {
    /// Cursor position in seconds from recording start
    pub cursor_time: f64,
    /// Propagation span in milliseconds; zero draws the main topomap only
    pub span_ms: f64,
    /// How the series frame is rendered when the span is non-zero
    pub mode: SeriesMode,
    /// Channel indices highlighted on the main topomap; out-of-range
    /// indices are ignored
    pub mask: Vec<usize>,
    /// Whether the main frame carries a colorbar
    pub colorbar: bool,
}

/// Frames produced by one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// The main topomap frame
    pub main: Frame,
    /// Averaged map or propagation grid; `None` when the span was zero
    pub series: Option<Frame>,
    /// Colorbar placement and value range, when one was painted
    pub colorbar: Option<ColorbarLayout>,
}

/// Per-session topomap state machine and renderer.
pub struct TopomapController {
    state: State,
    topomap_size: FrameSize,
    series_size: FrameSize,
    colormap: Colormap,
}

impl TopomapController {
    /// Create an uninitialized session with default frame sizes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Uninitialized,
            topomap_size: FrameSize::default(),
            series_size: FrameSize::default(),
            colormap: Colormap::default(),
        }
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self.state {
            State::Uninitialized => Stage::Uninitialized,
            State::MontageSet { .. } => Stage::MontageSet,
            State::ChannelsSet { .. } => Stage::ChannelsSet,
            State::DataSet { .. } => Stage::DataSet,
        }
    }

    /// Name of the active montage, if one is set.
    #[must_use]
    pub fn montage_name(&self) -> Option<&str> {
        match &self.state {
            State::Uninitialized => None,
            State::MontageSet { montage }
            | State::ChannelsSet { montage, .. }
            | State::DataSet { montage, .. } => Some(montage.name()),
        }
    }

    /// Select a standard montage by name.
    ///
    /// Channel info and data derived from a previous montage are dropped.
    ///
    /// # Errors
    ///
    /// A montage error for unknown names; the state is unchanged then.
    pub fn set_montage(&mut self, name: &str) -> Result<(), SessionError> {
        let montage = Montage::standard(name)?;
        self.state = State::MontageSet { montage };
        Ok(())
    }

    /// Store channel names and the shared sampling frequency.
    ///
    /// Data from a previous channel set is dropped. Channel names are not
    /// resolved against the montage here; resolution happens when data is
    /// attached.
    ///
    /// # Errors
    ///
    /// [`Precondition::MontageNotSet`] before any montage is chosen;
    /// invalid rates and empty name lists are internal errors.
    pub fn set_channels(&mut self, ch_names: Vec<String>, sfreq: f64) -> Result<(), SessionError> {
        if !(sfreq.is_finite() && sfreq > 0.0) {
            return Err(SessionError::InvalidSamplingRate { sfreq });
        }
        if ch_names.is_empty() {
            return Err(SessionError::NoChannels);
        }
        let montage = match &self.state {
            State::Uninitialized => {
                return Err(SessionError::Precondition(Precondition::MontageNotSet))
            }
            State::MontageSet { montage }
            | State::ChannelsSet { montage, .. }
            | State::DataSet { montage, .. } => montage.clone(),
        };
        self.state = State::ChannelsSet {
            montage,
            info: ChannelInfo::eeg(ch_names, sfreq),
        };
        Ok(())
    }

    /// Attach evoked data as a flattened channels x times buffer.
    ///
    /// # Errors
    ///
    /// [`Precondition::ChannelsNotSet`] before channel info exists; shape
    /// mismatches and unresolvable channel names are internal errors that
    /// leave any previous data in place.
    pub fn set_data(
        &mut self,
        data: Vec<f64>,
        n_channels: usize,
        n_times: usize,
    ) -> Result<(), SessionError> {
        let (montage, info) = match &self.state {
            State::Uninitialized | State::MontageSet { .. } => {
                return Err(SessionError::Precondition(Precondition::ChannelsNotSet))
            }
            State::ChannelsSet { montage, info } | State::DataSet { montage, info, .. } => {
                (montage, info)
            }
        };
        let evoked = Evoked::new(data, n_channels, n_times, info.clone(), montage)?;
        self.state = State::DataSet {
            montage: montage.clone(),
            info: info.clone(),
            evoked,
        };
        Ok(())
    }

    /// Store output frame sizes for the main topomap and the series frame.
    pub fn set_resolution(&mut self, topomap: FrameSize, series: FrameSize) {
        self.topomap_size = topomap;
        self.series_size = series;
    }

    /// Select the rendering colormap.
    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
    }

    /// Channel names of the current info; empty before channel info is set.
    #[must_use]
    pub fn list_channels(&self) -> &[String] {
        match &self.state {
            State::Uninitialized | State::MontageSet { .. } => &[],
            State::ChannelsSet { info, .. } | State::DataSet { info, .. } => &info.ch_names,
        }
    }

    /// Render the main topomap and, for a non-zero span, the series frame.
    ///
    /// # Errors
    ///
    /// [`Precondition::DataNotSet`] until data is attached. Nothing is
    /// rendered on error.
    pub fn render(&self, params: &DrawParams) -> Result<RenderOutput, SessionError> {
        let State::DataSet { evoked, .. } = &self.state else {
            return Err(SessionError::Precondition(Precondition::DataNotSet));
        };

        let painter = TopomapPainter::new(self.colormap);
        let positions = evoked.positions();

        let mut mask = vec![false; evoked.n_channels()];
        for &index in &params.mask {
            if let Some(slot) = mask.get_mut(index) {
                *slot = true;
            }
        }

        let values = evoked.values_at(params.cursor_time);
        let limit = symmetric_limit(&values);
        let mut main = Frame::new(self.topomap_size);
        let gutter = if params.colorbar {
            COLORBAR_GUTTER.min(self.topomap_size.width / 4)
        } else {
            0
        };
        let map_region = Rect::new(
            0,
            0,
            self.topomap_size.width.saturating_sub(gutter),
            self.topomap_size.height,
        );
        painter.paint_map(&mut main, map_region, positions, &values, &mask, limit);
        let colorbar = params
            .colorbar
            .then(|| painter.paint_colorbar(&mut main, -limit, limit));

        let span_s = params.span_ms.max(0.0) / 1000.0;
        let series = if span_s == 0.0 {
            None
        } else {
            Some(match params.mode {
                SeriesMode::Average => {
                    self.render_average(&painter, evoked, params.cursor_time, span_s)
                }
                SeriesMode::Propagation => {
                    self.render_grid(&painter, evoked, params.cursor_time, span_s)
                }
            })
        };

        Ok(RenderOutput {
            main,
            series,
            colorbar,
        })
    }

    /// One topomap of the span-wide average around the cursor.
    fn render_average(
        &self,
        painter: &TopomapPainter,
        evoked: &Evoked,
        cursor_time: f64,
        span_s: f64,
    ) -> Frame {
        let values = evoked.average_around(cursor_time, span_s);
        let limit = symmetric_limit(&values);
        let mut frame = Frame::new(self.series_size);
        let region = Rect::new(0, 0, self.series_size.width, self.series_size.height);
        painter.paint_map(&mut frame, region, evoked.positions(), &values, &[], limit);
        frame
    }

    /// 3x3 grid of topomaps at nine evenly spaced offsets covering
    /// `[-0.4 * span, 0.45 * span)` around the cursor.
    fn render_grid(
        &self,
        painter: &TopomapPainter,
        evoked: &Evoked,
        cursor_time: f64,
        span_s: f64,
    ) -> Frame {
        let offsets: Vec<f64> = (0..(GRID_COLS * GRID_ROWS))
            .map(|k| (-0.4 + 0.1 * f64::from(k)) * span_s)
            .collect();
        let columns: Vec<Vec<f64>> = offsets
            .iter()
            .map(|offset| evoked.values_at(cursor_time + offset))
            .collect();
        // One shared range across the grid so the cells are comparable.
        let limit = columns
            .iter()
            .map(|values| symmetric_limit(values))
            .fold(0.0, f64::max);

        let mut frame = Frame::new(self.series_size);
        let cell_w = self.series_size.width / GRID_COLS;
        let cell_h = self.series_size.height / GRID_ROWS;
        for (k, values) in columns.iter().enumerate() {
            let col = k as u32 % GRID_COLS;
            let row = k as u32 / GRID_COLS;
            let region = Rect::new(col * cell_w, row * cell_h, cell_w, cell_h);
            painter.paint_map(&mut frame, region, evoked.positions(), values, &[], limit);
        }
        frame
    }
}

impl Default for TopomapController {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest finite absolute value, for the symmetric color range.
fn symmetric_limit(values: &[f64]) -> f64 {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0, |acc, v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_session() -> TopomapController {
        let mut session = TopomapController::new();
        session.set_montage("standard_1020").unwrap();
        session
            .set_channels(vec!["Fp1".into(), "Cz".into(), "O2".into()], 256.0)
            .unwrap();
        session.set_data(vec![0.0; 3 * 256], 3, 256).unwrap();
        session
    }

    fn draw(span_ms: f64, mode: SeriesMode) -> DrawParams {
        DrawParams {
            cursor_time: 0.5,
            span_ms,
            mode,
            mask: vec![],
            colorbar: false,
        }
    }

    #[test]
    fn test_channels_require_montage() {
        let mut session = TopomapController::new();
        let err = session
            .set_channels(vec!["Fp1".into()], 256.0)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Precondition(Precondition::MontageNotSet)
        );
        assert_eq!(session.stage(), Stage::Uninitialized);
        assert!(session.list_channels().is_empty());
    }

    #[test]
    fn test_data_requires_channels() {
        let mut session = TopomapController::new();
        session.set_montage("standard_1020").unwrap();
        let err = session.set_data(vec![0.0; 4], 1, 4).unwrap_err();
        assert_eq!(
            err,
            SessionError::Precondition(Precondition::ChannelsNotSet)
        );
        assert_eq!(session.stage(), Stage::MontageSet);
    }

    #[test]
    fn test_render_requires_data() {
        let mut session = TopomapController::new();
        session.set_montage("standard_1020").unwrap();
        session
            .set_channels(vec!["Fp1".into(), "Cz".into()], 256.0)
            .unwrap();
        let err = session.render(&draw(0.0, SeriesMode::Average)).unwrap_err();
        assert_eq!(err, SessionError::Precondition(Precondition::DataNotSet));
    }

    #[test]
    fn test_list_channels_before_and_after() {
        let mut session = TopomapController::new();
        assert!(session.list_channels().is_empty());
        session.set_montage("standard_1020").unwrap();
        assert!(session.list_channels().is_empty());
        session
            .set_channels(vec!["Fp1".into(), "Cz".into()], 256.0)
            .unwrap();
        assert_eq!(session.list_channels(), ["Fp1", "Cz"]);
    }

    #[test]
    fn test_zero_span_skips_series() {
        let session = ready_session();
        let output = session.render(&draw(0.0, SeriesMode::Average)).unwrap();
        assert!(!output.main.is_blank());
        assert!(output.series.is_none());
    }

    #[test]
    fn test_end_to_end_average_mode() {
        let mut session = ready_session();
        session.set_resolution(FrameSize::new(320, 240), FrameSize::new(300, 300));
        let output = session.render(&draw(200.0, SeriesMode::Average)).unwrap();
        assert_eq!(output.main.width(), 320);
        assert_eq!(output.main.height(), 240);
        let series = output.series.unwrap();
        assert_eq!(series.width(), 300);
        assert!(!output.main.is_blank());
        assert!(!series.is_blank());
    }

    #[test]
    fn test_propagation_grid_renders() {
        let mut session = ready_session();
        session.set_resolution(FrameSize::new(320, 240), FrameSize::new(330, 330));
        let output = session.render(&draw(500.0, SeriesMode::Propagation)).unwrap();
        let series = output.series.unwrap();
        assert!(!series.is_blank());
        // Every grid cell carries a head outline: probe one pixel from the
        // center cell ring.
        let cell = 110.0;
        let cx = cell * 1.5;
        let cy = cell * 1.5;
        let radius = cell * 0.4;
        let x = cx as usize;
        let y = (cy - radius) as usize;
        let idx = (y * series.width() as usize + x) * 4;
        assert_ne!(&series.pixels()[idx..idx + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_colorbar_layout_reported() {
        let session = ready_session();
        let mut params = draw(0.0, SeriesMode::Average);
        params.colorbar = true;
        let output = session.render(&params).unwrap();
        let layout = output.colorbar.unwrap();
        assert!(layout.vmax >= layout.vmin);

        let plain = session.render(&draw(0.0, SeriesMode::Average)).unwrap();
        assert!(plain.colorbar.is_none());
    }

    #[test]
    fn test_mask_out_of_range_ignored() {
        let session = ready_session();
        let mut params = draw(0.0, SeriesMode::Average);
        params.mask = vec![1, 99];
        assert!(session.render(&params).is_ok());
    }

    #[test]
    fn test_montage_reset_drops_downstream_state() {
        let mut session = ready_session();
        assert_eq!(session.stage(), Stage::DataSet);
        session.set_montage("standard_1010").unwrap();
        assert_eq!(session.stage(), Stage::MontageSet);
        assert!(session.list_channels().is_empty());
        assert_eq!(session.montage_name(), Some("standard_1010"));
    }

    #[test]
    fn test_failed_setter_preserves_state() {
        let mut session = ready_session();
        assert!(session.set_montage("unknown").is_err());
        assert_eq!(session.stage(), Stage::DataSet);
        assert!(session.set_channels(vec![], 256.0).is_err());
        assert_eq!(session.stage(), Stage::DataSet);
        assert!(session.set_data(vec![0.0; 5], 3, 256).is_err());
        assert_eq!(session.stage(), Stage::DataSet);
    }
}
