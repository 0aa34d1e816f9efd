mod present;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::{debug, info, warn};
use mandelguessr::{
    colour::{normalize, CyclicPalette, Rgba},
    error::ParameterError,
    game::{Guess, Round, Scoreboard},
    grid::CancelToken,
    params::RenderParameters,
    points::PointsOfInterest,
    screen,
    view::View,
    zoom::ZoomSearch,
};
use num_complex::Complex64;
use rand::{rngs::StdRng, SeedableRng};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use present::{draw_marker, draw_segment, Presenter};

const MARKER: Rgba = Rgba::opaque(220, 30, 30);

#[derive(Parser, Debug)]
#[command(
    name = "mandelguessr",
    about = "Find where in the Mandelbrot set the zoomed-in hint was taken"
)]
struct Args {
    /// JSON array of [re, im] hyperbolic centres to draw targets from
    #[arg(long, default_value = "roots10.json")]
    points: PathBuf,

    /// Width of each pane in pixels
    #[arg(long, default_value_t = 500)]
    width: u32,

    /// Height of each pane in pixels
    #[arg(long, default_value_t = 500)]
    height: u32,

    #[arg(long, default_value_t = 256, allow_negative_numbers = true)]
    max_iter: i64,

    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    esc_radius: f64,

    /// Starting diameter for auto-framing the hint
    #[arg(long, default_value_t = 1e-5)]
    hint_diameter: f64,

    /// Seed for target selection; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    color_shift: f64,
}

/// Which half of the window the pointer is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pane {
    Hint,
    Main,
}

struct Session {
    params: RenderParameters,
    palette: CyclicPalette,
    colour_shift: f64,
    zoom_search: ZoomSearch,
    cancel: CancelToken,
    points: PointsOfInterest,
    rng: StdRng,
    hint_start_diameter: f64,
    pane_size: screen::Size,
    hint: View,
    main: View,
    round: Round,
    scoreboard: Scoreboard,
    last_guess: Option<Guess>,
}

impl Session {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let params = RenderParameters::new(args.max_iter, args.esc_radius)?;
        let mut points = PointsOfInterest::load(&args.points)?;
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let pane_size = screen::Size::new(args.width, args.height);
        let target = points
            .draw(&mut rng)
            .ok_or_else(|| anyhow!("no points of interest"))?;
        let hint = View::new(target, args.hint_diameter, pane_size)?;
        let main = View::new(Complex64::new(-0.5, 0.0), 4.0, pane_size)?;

        let mut session = Self {
            params,
            palette: CyclicPalette::new(),
            colour_shift: args.color_shift,
            zoom_search: ZoomSearch::default(),
            cancel: CancelToken::new(),
            points,
            rng,
            hint_start_diameter: args.hint_diameter,
            pane_size,
            hint,
            main,
            round: Round::new(target, args.hint_diameter),
            scoreboard: Scoreboard::default(),
            last_guess: None,
        };
        session.frame_hint()?;
        session.main.render(session.params, &session.cancel)?;
        Ok(session)
    }

    fn image_size(&self) -> screen::Size {
        screen::Size::new(2 * self.pane_size.width, self.pane_size.height)
    }

    fn frame_hint(&mut self) -> anyhow::Result<()> {
        let outcome = self.hint.find_zoom(&self.zoom_search, &self.cancel)?;
        if !outcome.converged {
            warn!(
                "hint framing stopped outside the target band (ratio {})",
                outcome.ratio
            );
        }
        self.round = Round::new(self.hint.center(), self.hint.diameter());
        Ok(())
    }

    fn new_round(&mut self) -> anyhow::Result<()> {
        let target = self
            .points
            .draw(&mut self.rng)
            .ok_or_else(|| anyhow!("every point of interest has been used"))?;
        self.hint.retarget(target, self.hint_start_diameter)?;
        self.frame_hint()?;

        self.last_guess = None;
        self.main.reset();
        self.main.render(self.params, &self.cancel)?;
        Ok(())
    }

    /// Convert a window position to the pane under it and fractional raster coordinates.
    fn locate(
        &self,
        window_size: PhysicalSize<u32>,
        position: PhysicalPosition<f64>,
    ) -> (Pane, f64, f64) {
        let image_size = self.image_size();
        let x = position.x * f64::from(image_size.width) / f64::from(window_size.width.max(1));
        let y = position.y * f64::from(image_size.height) / f64::from(window_size.height.max(1));

        // Pixel centres sit at integer raster coordinates; rows count up from the bottom.
        let raster_y = f64::from(image_size.height) - y - 0.5;
        let pane_width = f64::from(self.pane_size.width);
        if x < pane_width {
            (Pane::Hint, x - 0.5, raster_y)
        } else {
            (Pane::Main, x - pane_width - 0.5, raster_y)
        }
    }

    /// Apply a key press on the main pane. Returns whether the picture changed.
    ///
    /// A rejected zoom or parameter update leaves the view as it was and skips the render.
    fn handle_key(&mut self, key: char, pointer: Option<Complex64>) -> anyhow::Result<bool> {
        let changed = match (key, pointer) {
            ('z', Some(pointer)) => applied(self.main.zoom_in(pointer)),
            ('x', Some(pointer)) => applied(self.main.zoom_out(pointer)),
            ('s', Some(pointer)) => {
                self.main.recenter(pointer);
                true
            }
            ('r', Some(_)) => {
                self.main.reset();
                true
            }
            ('g', Some(pointer)) => {
                let guess = self.round.guess(pointer);
                self.scoreboard.record(&guess);
                self.round.frame(&mut self.main, &guess)?;
                self.last_guess = Some(guess);
                info!(
                    "score {} after {} guesses",
                    self.scoreboard.total, self.scoreboard.guesses
                );
                true
            }
            ('n', _) => {
                self.new_round()?;
                return Ok(true);
            }
            ('[', _) => self.update_max_iter(i64::from(self.params.max_iter()) / 2),
            (']', _) => self.update_max_iter(i64::from(self.params.max_iter()) * 2),
            ('-', _) => self.update_esc_radius(self.params.esc_radius() / 2.0),
            ('=', _) => self.update_esc_radius(self.params.esc_radius() * 2.0),
            ('c', _) => {
                self.colour_shift = (self.colour_shift + 0.1) % 1.0;
                return Ok(true);
            }
            _ => false,
        };

        if changed {
            self.main.render(self.params, &self.cancel)?;
        }
        Ok(changed)
    }

    fn update_max_iter(&mut self, max_iter: i64) -> bool {
        let changed = applied(self.params.set_max_iter(max_iter));
        if changed {
            info!("max_iter = {}", max_iter);
        }
        changed
    }

    fn update_esc_radius(&mut self, esc_radius: f64) -> bool {
        let changed = applied(self.params.set_esc_radius(esc_radius));
        if changed {
            info!("esc_radius = {}", esc_radius);
        }
        changed
    }

    /// Colour both panes side by side, hint on the left, with markers on top.
    fn compose(&self) -> Vec<Rgba> {
        let pane = self.pane_size;
        let paint = |view: &View| {
            let mut pixels = vec![Rgba::default(); pane.area()];
            self.palette
                .paint(&normalize(view.raster(), self.colour_shift), &mut pixels);
            pixels
        };

        let mut hint = paint(&self.hint);
        let (x, y) = self.hint.z_to_pixel(self.round.target);
        draw_marker(&mut hint, pane, x, y, MARKER);

        let mut main = paint(&self.main);
        if let Some(guess) = self.last_guess {
            let from = self.main.z_to_pixel(guess.pointer);
            let to = self.main.z_to_pixel(guess.target);
            draw_segment(&mut main, pane, from, to, MARKER);
            draw_marker(&mut main, pane, from.0, from.1, MARKER);
            draw_marker(&mut main, pane, to.0, to.1, MARKER);
        }

        let width = pane.width.max(1) as usize;
        hint.chunks(width)
            .zip(main.chunks(width))
            .flat_map(|(left, right)| left.iter().chain(right).copied())
            .collect()
    }
}

/// Log a rejected update; true if it went through.
fn applied(result: Result<(), ParameterError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("{}", err);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    debug!("{:?}", args);
    info!("rendering on {} cores", num_cpus::get());

    let mut session = Session::new(&args).context("failed to start session")?;

    let event_loop = EventLoop::new();
    let image_size = session.image_size();
    let window = WindowBuilder::new()
        .with_title("MandelGuessr")
        .with_inner_size(PhysicalSize::new(image_size.width, image_size.height))
        .build(&event_loop)?;

    let mut presenter = Presenter::new(&window, image_size)?;
    presenter.upload(&session.compose());

    let mut cursor: Option<(Pane, f64, f64)> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    presenter.resize(size);
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let located = session.locate(window.inner_size(), position);
                    let (pane, x, y) = located;
                    let view = match pane {
                        Pane::Hint => &session.hint,
                        Pane::Main => &session.main,
                    };
                    let z = view.pixel_to_z(x, y);
                    window.set_title(&format!(
                        "MandelGuessr  {:+.12} {:+.12}i  score {}",
                        z.re, z.im, session.scoreboard.total
                    ));
                    cursor = Some(located);
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                }
                WindowEvent::ReceivedCharacter(key) => {
                    let pointer = match cursor {
                        Some((Pane::Main, x, y)) => Some(session.main.pixel_to_z(x, y)),
                        _ => None,
                    };
                    match session.handle_key(key, pointer) {
                        Ok(true) => {
                            presenter.upload(&session.compose());
                            window.request_redraw();
                        }
                        Ok(false) => {}
                        Err(err) => warn!("{:#}", err),
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                if let Err(err) = presenter.draw() {
                    warn!("{:#}", err);
                }
            }
            _ => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn session(max_iter: i64, esc_radius: f64) -> (Session, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[-1.0, 0.0]]").unwrap();
        let args = Args {
            points: file.path().to_path_buf(),
            width: 8,
            height: 8,
            max_iter,
            esc_radius,
            hint_diameter: 1e-5,
            seed: Some(7),
            color_shift: 0.0,
        };
        (Session::new(&args).unwrap(), file)
    }

    #[test]
    fn rejected_parameter_keys_report_no_change() {
        let (mut session, _file) = session(1, 1.5);
        let params = session.params;

        assert!(!session.handle_key('[', None).unwrap());
        assert!(!session.handle_key('-', None).unwrap());
        assert_eq!(session.params, params);

        assert!(session.handle_key(']', None).unwrap());
        assert_eq!(session.params.max_iter(), 2);
    }

    #[test]
    fn escape_radius_cannot_grow_past_limit() {
        let (mut session, _file) = session(16, 1e150);
        assert!(!session.handle_key('=', None).unwrap());
        assert_eq!(session.params.esc_radius(), 1e150);
        assert!(session.handle_key('-', None).unwrap());
    }

    #[test]
    fn rejected_zoom_keeps_main_frame() {
        let (mut session, _file) = session(16, 100.0);
        let pointer = Complex64::new(0.0, 0.0);
        while session.main.zoom_out(pointer).is_ok() {}
        let (center, diameter) = (session.main.center(), session.main.diameter());

        assert!(!session.handle_key('x', Some(pointer)).unwrap());
        assert_eq!(session.main.center(), center);
        assert_eq!(session.main.diameter(), diameter);

        assert!(session.handle_key('z', Some(pointer)).unwrap());
        assert_eq!(session.main.diameter(), diameter / 2.0);
    }
}
