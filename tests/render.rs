mod tests {
    use lane_comet::{
        LaneConfig, LaneRenderer, LaneStatus, LaneSurface, Meters, MotionState, Rgb, SurfaceError,
        meters_to_index,
    };

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    struct MockSurface {
        pixels: Vec<Rgb>,
        clears: usize,
        shows: usize,
    }

    impl MockSurface {
        fn new(leds: usize) -> Self {
            Self {
                pixels: vec![BLACK; leds],
                clears: 0,
                shows: 0,
            }
        }

        fn lit_range(&self) -> Option<(usize, usize)> {
            let first = self.pixels.iter().position(|p| *p != BLACK)?;
            let last = self.pixels.iter().rposition(|p| *p != BLACK)?;
            Some((first, last))
        }
    }

    impl LaneSurface for MockSurface {
        fn set_length(&mut self, leds: u32) -> Result<(), SurfaceError> {
            self.pixels = vec![BLACK; leds as usize];
            Ok(())
        }

        fn clear(&mut self) {
            self.clears += 1;
            for p in &mut self.pixels {
                *p = BLACK;
            }
        }

        fn fill_forward(&mut self, start: u32, count: u32, color: Rgb) {
            let len = self.pixels.len();
            let begin = (start as usize).min(len);
            let end = ((start + count) as usize).min(len);
            for p in &mut self.pixels[begin..end] {
                *p = color;
            }
        }

        fn fill_backward(&mut self, start: u32, count: u32, color: Rgb) {
            let len = self.pixels.len() as u32;
            let begin = len.saturating_sub(start + count);
            let end = len.saturating_sub(start);
            for p in &mut self.pixels[begin as usize..end as usize] {
                *p = color;
            }
        }

        fn show(&mut self) {
            self.shows += 1;
        }
    }

    fn config() -> LaneConfig {
        LaneConfig {
            color: RED,
            line_length: Meters::new(10.0),
            active_length: Meters::new(2.0),
            total_length: Meters::new(10.0),
            line_leds: 101,
            fps: 10,
        }
    }

    #[test]
    fn test_meters_to_index_mapping() {
        // 101 LEDs over 10 m: 10.1 LEDs per meter.
        assert_eq!(meters_to_index(5.0, 10.1), 52);
        assert_eq!(meters_to_index(0.0, 10.1), 1);
        assert_eq!(meters_to_index(10.0, 10.1), 102);
    }

    #[test]
    fn test_forward_fill_counts_from_strip_start() {
        let cfg = config();
        let mut surface = MockSurface::new(101);
        let state = MotionState {
            shift: 5.0,
            speed: 1.0,
            head: 5.0,
            raw_head: 5.0,
            tail: 3.0,
            status: LaneStatus::Forward,
        };
        LaneRenderer.render(&state, &cfg, &mut surface);

        // tail index 31, head index 52: pixels [31, 52) are lit.
        assert_eq!(surface.lit_range(), Some((31, 51)));
        assert_eq!(surface.pixels[40], RED);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.shows, 1);
    }

    #[test]
    fn test_backward_fill_is_mirrored() {
        let cfg = config();
        let mut surface = MockSurface::new(101);
        let state = MotionState {
            shift: 5.0,
            speed: 1.0,
            head: 5.0,
            raw_head: 5.0,
            tail: 3.0,
            status: LaneStatus::Backward,
        };
        LaneRenderer.render(&state, &cfg, &mut surface);

        // Mirrored: 101 − 31 − 21 = 49, so pixels [49, 70) are lit.
        assert_eq!(surface.lit_range(), Some((49, 69)));
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let cfg = config();
        let mut surface = MockSurface::new(101);
        surface.pixels[0] = RED;
        let state = MotionState {
            status: LaneStatus::Stop,
            ..MotionState::default()
        };
        LaneRenderer.render(&state, &cfg, &mut surface);
        assert_eq!(surface.lit_range(), None);
        assert_eq!(surface.shows, 1);
    }

    #[test]
    fn test_zero_length_comet_lights_nothing() {
        let cfg = config();
        let mut surface = MockSurface::new(101);
        let state = MotionState {
            status: LaneStatus::Forward,
            ..MotionState::default()
        };
        LaneRenderer.render(&state, &cfg, &mut surface);
        assert_eq!(surface.lit_range(), None);
    }

    #[test]
    fn test_blink_markers_light_both_ends() {
        let cfg = config();
        let mut surface = MockSurface::new(101);
        LaneRenderer.render_markers(&cfg, true, &mut surface);
        assert_eq!(surface.pixels[0], RED);
        assert_eq!(surface.pixels[9], RED);
        assert_eq!(surface.pixels[10], BLACK);
        assert_eq!(surface.pixels[100], RED);
        assert_eq!(surface.pixels[91], RED);
        assert_eq!(surface.pixels[90], BLACK);

        LaneRenderer.render_markers(&cfg, false, &mut surface);
        assert_eq!(surface.lit_range(), None);
    }
}
