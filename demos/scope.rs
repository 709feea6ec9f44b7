use std::time::Duration;

use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Context, Entity, IntoElement,
    ParentElement, Render, Styled, Timer, Window, WindowBounds, WindowOptions, div, px, size,
};

use gpui_scope::{
    ChannelSamples, CursorId, CursorShape, GpuiScopeView, GraphFormat, SampleFrame, Scope,
};

const SAMPLES: usize = 512;

struct ScopeWindow {
    main: Entity<GpuiScopeView>,
    zoomed: Entity<GpuiScopeView>,
}

impl Render for ScopeWindow {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .flex()
            .flex_col()
            .child(div().flex_1().child(self.main.clone()))
            .child(div().flex_1().child(self.zoomed.clone()))
    }
}

fn acquire(phase: f64) -> SampleFrame {
    let sine = (0..SAMPLES)
        .map(|i| (phase + i as f64 * 0.05).sin() * 1.5)
        .collect();
    let square = (0..SAMPLES)
        .map(|i| {
            if (phase * 3.0 + i as f64 * 0.02).sin() > 0.0 {
                0.8
            } else {
                -0.8
            }
        })
        .collect();
    SampleFrame {
        voltage: vec![
            ChannelSamples {
                samples: sine,
                used: true,
            },
            ChannelSamples {
                samples: square,
                used: true,
            },
        ],
        spectrum: Vec::new(),
        format: GraphFormat::TY,
    }
}

fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(720.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let mut scope = Scope::builder()
                .channels(2)
                .gain(0, 0.5)
                .history_capacity(6)
                .build();
            scope
                .set_channel_used(CursorId::Voltage(0), true)
                .expect("channel 0 exists");
            scope
                .set_channel_used(CursorId::Voltage(1), true)
                .expect("channel 1 exists");
            scope
                .set_cursor_shape(CursorId::Voltage(0), CursorShape::Rectangular)
                .expect("channel 0 cursor exists");
            scope.set_zoom_enabled(true);

            let main = GpuiScopeView::new(scope);
            let zoomed = main.zoomed();
            let handle = main.scope_handle();
            let main = cx.new(|_| main);
            let zoomed = cx.new(|_| zoomed);

            let views = (main.clone(), zoomed.clone());
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut phase = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_millis(33)).await;
                            phase += 0.15;
                            let frame = acquire(phase);
                            let inserted = handle.write(|scope| scope.insert_frame(&frame));
                            if let Some(Err(err)) = inserted {
                                eprintln!("dropped frame: {err}");
                            }
                            cx.update(|_, cx| {
                                views.0.update(cx, |_, view_cx| view_cx.notify());
                                views.1.update(cx, |_, view_cx| view_cx.notify());
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            cx.new(|_| ScopeWindow { main, zoomed })
        })
        .unwrap();
    });
}
