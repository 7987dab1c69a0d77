use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::SyntaxGraph;

const FRAME_DT: f32 = 0.016;

const NO_FRAME: i32 = -1;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Loop liveness and the id of the queued frame.
///
/// Shared with `on_cleanup`, so it has to be `Send + Sync`.
#[derive(Clone)]
struct FrameSlot {
	alive: Arc<AtomicBool>,
	pending: Arc<AtomicI32>,
}

impl FrameSlot {
	fn new() -> Self {
		Self {
			alive: Arc::new(AtomicBool::new(true)),
			pending: Arc::new(AtomicI32::new(NO_FRAME)),
		}
	}

	fn is_alive(&self) -> bool {
		self.alive.load(Ordering::Relaxed)
	}

	fn is_pending(&self) -> bool {
		self.pending.load(Ordering::Relaxed) != NO_FRAME
	}

	fn mark_requested(&self, id: i32) {
		self.pending.store(id, Ordering::Relaxed);
	}

	fn clear_pending(&self) {
		self.pending.store(NO_FRAME, Ordering::Relaxed);
	}

	/// Stops the loop and hands back the frame that still has to be cancelled.
	fn shutdown(&self) -> Option<i32> {
		self.alive.store(false, Ordering::Relaxed);
		match self.pending.swap(NO_FRAME, Ordering::Relaxed) {
			NO_FRAME => None,
			id => Some(id),
		}
	}
}

/// Schedules the next animation frame unless one is already queued.
fn request_frame(frame: &FrameCallback, slot: &FrameSlot) {
	if !slot.is_alive() || slot.is_pending() {
		return;
	}
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(ref cb) = *frame.borrow() {
		if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			slot.mark_requested(id);
		}
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Force-directed drawing of a [`SyntaxGraph`] on a canvas.
///
/// The layout is rebuilt from scratch whenever `data` changes. Frames are
/// only requested while the simulation is active or a node is being dragged,
/// and the loop stops for good once the component is cleaned up.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<SyntaxGraph>,
	#[prop(default = 300.0)] width: f64,
	#[prop(default = 200.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let frame: FrameCallback = Rc::new(RefCell::new(None));
	let slot = FrameSlot::new();

	let slot_cleanup = slot.clone();
	on_cleanup(move || {
		if let Some(id) = slot_cleanup.shutdown() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	});

	let (state_init, frame_init, slot_init) = (state.clone(), frame.clone(), slot.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let graph = data.get();

		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let layout = ForceGraphState::new(&graph, width, height);
		debug!(
			"laying out {} nodes, {} links ({} dropped)",
			layout.node_count(),
			layout.links().len(),
			layout.dropped_links()
		);
		*state_init.borrow_mut() = Some(layout);

		if frame_init.borrow().is_none() {
			let Some(ctx) = context_2d(&canvas) else {
				warn!("canvas has no 2d context; graph not drawn");
				return;
			};
			// weak, so the closure does not keep itself alive
			let frame_inner: Weak<_> = Rc::downgrade(&frame_init);
			let (state_anim, slot_anim) = (state_init.clone(), slot_init.clone());
			*frame_init.borrow_mut() = Some(Closure::new(move || {
				slot_anim.clear_pending();
				if !slot_anim.is_alive() {
					state_anim.borrow_mut().take();
					return;
				}
				let active = match *state_anim.borrow_mut() {
					Some(ref mut s) => {
						s.tick(FRAME_DT);
						render::paint(&render::scene(s), &ctx, s.width, s.height);
						s.is_active()
					}
					None => false,
				};
				if active {
					if let Some(frame) = frame_inner.upgrade() {
						request_frame(&frame, &slot_anim);
					}
				}
			}));
		}
		request_frame(&frame_init, &slot_init);
	});

	let (state_md, frame_md, slot_md) = (state.clone(), frame.clone(), slot);
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let grabbed = match *state_md.borrow_mut() {
			Some(ref mut s) => s.begin_drag(x, y),
			None => false,
		};
		if grabbed {
			request_frame(&frame_md, &slot_md);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active() {
				s.drag_to(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_drag();
		}
	};

	let state_ml = state;
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_drag();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="syntax-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: grab;"
		/>
	}
}
