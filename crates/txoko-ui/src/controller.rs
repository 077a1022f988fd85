//! The control loop's brain: decides once per tick what, if anything, to redraw.
//!
//! The controller alternates between [`DisplayMode::Clock`] and
//! [`DisplayMode::Price`] every `mode_duration`. In clock mode it redraws
//! only when the minute changes, using a partial refresh, except right after
//! startup or a flip back to clock, which get a full refresh. In price mode
//! it fetches and draws once per cycle. Failures never stop the loop; they
//! turn into a skipped frame or the `--` placeholder.

use alloc::string::ToString;
use core::time::Duration;

use crate::config::ClockConfig;
use crate::mode::{ControllerState, DisplayMode};
use crate::price::{format_price, PRICE_PLACEHOLDER};
use crate::renderer::{FrameContent, Renderer};
use crate::sources::{ClockSource, PriceSource};

/// Redraw performed by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    None,
    ClockPartial,
    ClockFull,
    Price,
}

/// Outcome of [`DisplayModeController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub redraw: Redraw,
    /// How long the loop should wait before the next tick.
    pub sleep: Duration,
}

pub struct DisplayModeController<C, P, R> {
    clock: C,
    prices: P,
    renderer: R,
    config: ClockConfig,
    state: ControllerState,
}

impl<C, P, R> DisplayModeController<C, P, R>
where
    C: ClockSource,
    P: PriceSource,
    R: Renderer,
{
    /// Start in clock mode at monotonic time `now`; the first tick renders a full frame.
    pub fn new(clock: C, prices: P, renderer: R, config: ClockConfig, now: Duration) -> Self {
        Self {
            clock,
            prices,
            renderer,
            config,
            state: ControllerState::new(now),
        }
    }

    /// Flip the mode if `mode_duration` has elapsed since the last flip.
    ///
    /// Returns the new mode when a flip happened. At most one flip per call.
    pub fn advance_mode(&mut self, now: Duration) -> Option<DisplayMode> {
        if self.state.elapsed(now) < self.config.mode_duration {
            return None;
        }

        let mode = self.state.current_mode.toggled();
        self.state.current_mode = mode;
        self.state.last_change_at = now;
        self.state.price_rendered_this_cycle = false;
        if mode == DisplayMode::Clock {
            self.state.full_redraw_pending = true;
        }
        log::info!("Mode: switched to {}", mode.label());
        Some(mode)
    }

    /// One pass of the control loop at monotonic time `now`.
    pub fn tick(&mut self, now: Duration) -> Tick {
        self.advance_mode(now);
        match self.state.current_mode {
            DisplayMode::Clock => self.tick_clock(),
            DisplayMode::Price => self.tick_price(),
        }
    }

    fn tick_clock(&mut self) -> Tick {
        let time = match self.clock.now() {
            Ok(time) => time,
            Err(e) => {
                log::warn!(
                    "Clock: read failed ({e}), retrying in {:?}",
                    self.config.clock_retry_backoff
                );
                return Tick {
                    redraw: Redraw::None,
                    sleep: self.config.clock_retry_backoff,
                };
            }
        };

        let text = time.to_string();
        let redraw = if self.state.full_redraw_pending {
            let content = FrameContent {
                headline: &text,
                caption: self.config.clock_caption.as_deref(),
            };
            match self.renderer.render_full_frame(&content) {
                Ok(()) => {
                    log::info!("Clock: full redraw {text}");
                    self.state.full_redraw_pending = false;
                    self.state.last_rendered_minute = Some(time.minute());
                    Redraw::ClockFull
                }
                Err(e) => {
                    log::warn!("Clock: full redraw failed: {e:?}");
                    Redraw::None
                }
            }
        } else if self.state.last_rendered_minute != Some(time.minute()) {
            match self.renderer.render_partial_frame(&text) {
                Ok(()) => {
                    log::info!("Clock: partial redraw {text}");
                    self.state.last_rendered_minute = Some(time.minute());
                    Redraw::ClockPartial
                }
                Err(e) => {
                    log::warn!("Clock: partial redraw failed: {e:?}");
                    Redraw::None
                }
            }
        } else {
            Redraw::None
        };

        Tick {
            redraw,
            sleep: self.config.tick_interval,
        }
    }

    fn tick_price(&mut self) -> Tick {
        let idle = Tick {
            redraw: Redraw::None,
            sleep: self.config.tick_interval,
        };
        if self.state.price_rendered_this_cycle {
            return idle;
        }

        let headline = match self.prices.fetch_price() {
            Ok(price) if price < 0.0 || !price.is_finite() => {
                log::warn!("Price: source returned unusable value {price}");
                PRICE_PLACEHOLDER.to_string()
            }
            Ok(price) => {
                log::info!("Price: {price}");
                format_price(price)
            }
            Err(e) => {
                log::warn!("Price: fetch failed: {e}");
                PRICE_PLACEHOLDER.to_string()
            }
        };

        let content = FrameContent {
            headline: &headline,
            caption: Some(self.config.price_caption.as_str()),
        };
        match self.renderer.render_full_frame(&content) {
            Ok(()) => {
                self.state.price_rendered_this_cycle = true;
                Tick {
                    redraw: Redraw::Price,
                    ..idle
                }
            }
            Err(e) => {
                log::warn!("Price: redraw failed: {e:?}");
                idle
            }
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn prices(&self) -> &P {
        &self.prices
    }

    pub fn prices_mut(&mut self) -> &mut P {
        &mut self.prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{ClockError, PriceError, WallTime};
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    struct Script(VecDeque<Result<WallTime, ClockError>>);

    impl ClockSource for Script {
        fn now(&mut self) -> Result<WallTime, ClockError> {
            self.0.pop_front().unwrap_or(Err(ClockError::NotSynchronized))
        }
    }

    struct Prices {
        next: Result<f64, PriceError>,
        calls: usize,
    }

    impl PriceSource for Prices {
        fn fetch_price(&mut self) -> Result<f64, PriceError> {
            self.calls += 1;
            self.next.clone()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Full(String, Option<String>),
        Partial(String),
    }

    #[derive(Default)]
    struct Log {
        calls: Vec<Call>,
        fail: bool,
    }

    impl Renderer for Log {
        type Error = ();

        fn render_full_frame(&mut self, content: &FrameContent<'_>) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.calls.push(Call::Full(
                content.headline.to_string(),
                content.caption.map(String::from),
            ));
            Ok(())
        }

        fn render_partial_frame(&mut self, text: &str) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.calls.push(Call::Partial(text.to_string()));
            Ok(())
        }
    }

    fn at(h: u8, m: u8) -> Result<WallTime, ClockError> {
        Ok(WallTime::new(h, m).unwrap())
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn controller(
        times: impl IntoIterator<Item = Result<WallTime, ClockError>>,
        price: Result<f64, PriceError>,
    ) -> DisplayModeController<Script, Prices, Log> {
        DisplayModeController::new(
            Script(times.into_iter().collect()),
            Prices {
                next: price,
                calls: 0,
            },
            Log::default(),
            ClockConfig::default(),
            Duration::ZERO,
        )
    }

    #[test]
    fn first_tick_is_full_clock_frame() {
        let mut c = controller([at(12, 34)], Ok(1.0));
        let tick = c.tick(secs(0));
        assert_eq!(tick.redraw, Redraw::ClockFull);
        assert_eq!(tick.sleep, secs(1));
        assert_eq!(c.renderer().calls, vec![Call::Full("12:34".into(), None)]);
        assert_eq!(c.state().last_rendered_minute, Some(34));
        assert!(!c.state().full_redraw_pending);
    }

    #[test]
    fn minute_rollover_is_one_partial() {
        let mut c = controller([at(14, 58), at(14, 59), at(14, 59), at(15, 0)], Ok(1.0));
        c.tick(secs(0));
        assert_eq!(c.tick(secs(1)).redraw, Redraw::ClockPartial);
        assert_eq!(c.state().last_rendered_minute, Some(59));
        assert_eq!(c.tick(secs(2)).redraw, Redraw::None);
        assert_eq!(c.tick(secs(3)).redraw, Redraw::ClockPartial);
        assert_eq!(c.state().last_rendered_minute, Some(0));

        let partials: Vec<_> = c
            .renderer()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Partial(_)))
            .cloned()
            .collect();
        assert_eq!(
            partials,
            vec![Call::Partial("14:59".into()), Call::Partial("15:00".into())]
        );
    }

    #[test]
    fn clock_failure_backs_off_without_render() {
        let mut c = controller([Err(ClockError::NotSynchronized)], Ok(1.0));
        let tick = c.tick(secs(0));
        assert_eq!(tick.redraw, Redraw::None);
        assert_eq!(tick.sleep, secs(5));
        assert!(c.renderer().calls.is_empty());
        assert!(c.state().full_redraw_pending);
        assert_eq!(c.state().last_rendered_minute, None);
    }

    #[test]
    fn flip_to_price_fetches_once() {
        let mut c = controller([at(10, 0)], Ok(67123.45));
        c.tick(secs(0));

        assert_eq!(c.advance_mode(secs(299)), None);
        let tick = c.tick(secs(300));
        assert_eq!(tick.redraw, Redraw::Price);
        assert_eq!(c.state().current_mode, DisplayMode::Price);
        assert_eq!(c.state().last_change_at, secs(300));
        assert!(c.state().price_rendered_this_cycle);
        assert_eq!(c.prices_mut().calls, 1);
        assert_eq!(
            c.renderer().calls.last(),
            Some(&Call::Full("$67,123".into(), Some("BTC/USD".into())))
        );

        for s in 301..600 {
            assert_eq!(c.tick(secs(s)).redraw, Redraw::None);
        }
        assert_eq!(c.prices_mut().calls, 1);
    }

    #[test]
    fn flip_resets_price_flag_before_fetch() {
        let mut c = controller([at(10, 0)], Ok(5.0));
        c.tick(secs(0));
        assert_eq!(c.advance_mode(secs(300)), Some(DisplayMode::Price));
        assert!(!c.state().price_rendered_this_cycle);
        assert_eq!(c.prices_mut().calls, 0);
    }

    #[test]
    fn price_failure_renders_placeholder() {
        let mut c = controller([at(10, 0)], Err(PriceError::Http(503)));
        c.tick(secs(0));
        assert_eq!(c.tick(secs(300)).redraw, Redraw::Price);
        assert_eq!(
            c.renderer().calls.last(),
            Some(&Call::Full("--".into(), Some("BTC/USD".into())))
        );
        assert!(c.state().price_rendered_this_cycle);
    }

    #[test]
    fn negative_or_nan_price_renders_placeholder() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let mut c = controller([at(10, 0)], Ok(bad));
            c.tick(secs(0));
            assert_eq!(c.tick(secs(300)).redraw, Redraw::Price);
            assert_eq!(
                c.renderer().calls.last(),
                Some(&Call::Full("--".into(), Some("BTC/USD".into())))
            );
        }
    }

    #[test]
    fn return_to_clock_forces_full_redraw_same_minute() {
        let mut c = controller([at(10, 0), at(10, 5)], Ok(1.0));
        c.tick(secs(0));
        c.tick(secs(300));
        c.clock_mut().0.push_back(at(10, 5));
        // Minute already differs, but a flip into clock must be a full frame.
        let tick = c.tick(secs(600));
        assert_eq!(tick.redraw, Redraw::ClockFull);
        assert_eq!(c.state().current_mode, DisplayMode::Clock);

        c.clock_mut().0.push_back(at(10, 5));
        assert_eq!(c.tick(secs(601)).redraw, Redraw::None);
    }

    #[test]
    fn render_failure_is_retried_next_tick() {
        let mut c = controller([at(9, 0), at(9, 0)], Ok(1.0));
        c.renderer_mut().fail = true;
        assert_eq!(c.tick(secs(0)).redraw, Redraw::None);
        assert!(c.state().full_redraw_pending);
        assert_eq!(c.state().last_rendered_minute, None);

        c.renderer_mut().fail = false;
        assert_eq!(c.tick(secs(1)).redraw, Redraw::ClockFull);
        assert_eq!(c.state().last_rendered_minute, Some(0));
    }

    #[test]
    fn late_tick_flips_only_once() {
        let mut c = controller([at(9, 0), at(9, 1)], Ok(1.0));
        c.tick(secs(0));
        // Three windows late: still a single flip, timer restarts at now.
        assert_eq!(c.advance_mode(secs(1000)), Some(DisplayMode::Price));
        assert_eq!(c.advance_mode(secs(1000)), None);
        assert_eq!(c.advance_mode(secs(1299)), None);
        assert_eq!(c.advance_mode(secs(1300)), Some(DisplayMode::Clock));
    }

    proptest! {
        #[test]
        fn one_partial_per_distinct_minute(minutes in proptest::collection::vec(0u8..60, 1..60)) {
            let times: Vec<_> = minutes.iter().map(|m| at(12, *m)).collect();
            let mut c = controller(times, Ok(1.0));
            for (i, _) in minutes.iter().enumerate() {
                c.tick(secs(i as u64));
            }

            let transitions = minutes.windows(2).filter(|w| w[0] != w[1]).count();
            let partials = c
                .renderer()
                .calls
                .iter()
                .filter(|call| matches!(call, Call::Partial(_)))
                .count();
            prop_assert_eq!(partials, transitions);
            prop_assert_eq!(c.state().last_rendered_minute, minutes.last().copied());
        }

        #[test]
        fn flips_never_closer_than_threshold(gaps in proptest::collection::vec(1u64..400, 1..40)) {
            let mut c = controller([], Ok(1.0));
            let mut now = 0;
            let mut last_flip = 0;
            for gap in gaps {
                now += gap;
                if c.advance_mode(secs(now)).is_some() {
                    prop_assert!(now - last_flip >= 300);
                    last_flip = now;
                }
            }
        }
    }
}
