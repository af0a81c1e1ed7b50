// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Before/after comparison pages for images and videos.
//!
//! The page is built from code. `<body data-page="video">` selects the video
//! page, anything else the image page; `data-assets="01,02,..."` lists the
//! selectable asset indices. Media paths are relative to the page
//! (`Ours/01.png`, `3DGS/01.mp4`, `gt/01.png`).
//!
//! Build with: `wasm-pack build --target web demos/web_compare`
//! Then serve `demos/web_compare/` and open `index.html` or `video.html`.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use core::cell::RefCell;

use juxta_backend_web::{
    ConsoleSink, EventQueue, ImageHandle, LabelPresenter, RafLoop, VideoHandle, set_text,
};
use juxta_core::error::ControlError;
use juxta_core::geometry::SliderPosition;
use juxta_core::load::ImagePair;
use juxta_core::media::Side;
use juxta_core::pair::PairController;
use juxta_core::policy::{CorrectionTarget, SyncPolicy};
use juxta_core::selection::{CompareMode, MediaKind, Selection};
use juxta_core::time::HostTime;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlImageElement,
    HtmlInputElement, HtmlSelectElement, HtmlVideoElement, console,
};

const DEFAULT_ASSETS: &[&str] = &["01", "02", "03", "04", "05", "06"];

/// Entry point for the comparison demo.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let assets = asset_list(body.get_attribute("data-assets").as_deref());

    match body.get_attribute("data-page").as_deref() {
        Some("video") => video_page(&document, &body, &assets),
        _ => image_page(&document, &body, &assets),
    }
}

fn asset_list(attr: Option<&str>) -> Vec<String> {
    let listed: Vec<String> = attr
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if listed.is_empty() {
        DEFAULT_ASSETS.iter().map(|s| String::from(*s)).collect()
    } else {
        listed
    }
}

// ---------------------------------------------------------------------------
// Shared page skeleton
// ---------------------------------------------------------------------------

/// Elements shared by both pages. The two media elements are handed to the
/// media handles separately.
struct Stage {
    title: HtmlElement,
    container: HtmlElement,
    left_label: HtmlElement,
    right_label: HtmlElement,
    legend_left: HtmlElement,
    legend_right: HtmlElement,
    controls: HtmlElement,
    select: HtmlSelectElement,
    slider: HtmlInputElement,
    status: HtmlElement,
}

fn build_stage<M: JsCast>(
    doc: &Document,
    body: &HtmlElement,
    media_tag: &str,
    assets: &[String],
) -> Result<(Stage, M, M), JsValue> {
    let shell = element(doc, "section")?;
    style(
        &shell,
        "width: 960px; margin: 24px auto; display: grid; gap: 12px; justify-items: center; font: 14px/1.4 system-ui, sans-serif;",
    )?;
    body.append_child(&shell)?;

    let title = element(doc, "h1")?;
    shell.append_child(&title)?;

    let container = element(doc, "div")?;
    style(
        &container,
        "--position: 50%; position: relative; width: 900px; aspect-ratio: 16 / 9; overflow: hidden; border-radius: 12px; background: #111;",
    )?;
    shell.append_child(&container)?;

    // The after side covers the part of the container left of the divider.
    let before = media(doc, media_tag, "position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover;")?;
    let after = media(
        doc,
        media_tag,
        "position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; clip-path: inset(0 calc(100% - var(--position)) 0 0);",
    )?;
    container.append_child(&before)?;
    container.append_child(&after)?;

    let divider = element(doc, "div")?;
    style(
        &divider,
        "position: absolute; top: 0; bottom: 0; left: var(--position); width: 2px; margin-left: -1px; background: #fff; pointer-events: none;",
    )?;
    container.append_child(&divider)?;

    let label_css = "position: absolute; top: 16px; padding: 4px 10px; border-radius: 6px; background: rgba(0,0,0,0.6); color: #fff; font-weight: 600; pointer-events: none;";
    let left_label = element(doc, "div")?;
    style(&left_label, &format!("{label_css} left: 16px;"))?;
    let right_label = element(doc, "div")?;
    style(&right_label, &format!("{label_css} right: 16px;"))?;
    container.append_child(&left_label)?;
    container.append_child(&right_label)?;

    let slider: HtmlInputElement = doc.create_element("input")?.unchecked_into();
    slider.set_type("range");
    slider.set_min("0");
    slider.set_max("100");
    slider.set_value("50");
    style(&slider, "width: 900px;")?;
    shell.append_child(&slider)?;

    let legend = element(doc, "div")?;
    style(&legend, "width: 900px; display: flex; justify-content: space-between;")?;
    let legend_left = element(doc, "span")?;
    let legend_right = element(doc, "span")?;
    legend.append_child(&legend_left)?;
    legend.append_child(&legend_right)?;
    shell.append_child(&legend)?;

    let controls = element(doc, "div")?;
    style(&controls, "display: flex; gap: 8px; align-items: center;")?;
    let select: HtmlSelectElement = doc.create_element("select")?.unchecked_into();
    for index in assets {
        let option = doc.create_element("option")?;
        option.set_attribute("value", index)?;
        option.set_text_content(Some(index));
        select.append_child(&option)?;
    }
    controls.append_child(&select)?;
    shell.append_child(&controls)?;

    let status = element(doc, "div")?;
    style(&status, "min-height: 1.4em; color: #445;")?;
    shell.append_child(&status)?;

    let stage = Stage {
        title,
        container,
        left_label,
        right_label,
        legend_left,
        legend_right,
        controls,
        select,
        slider,
        status,
    };
    Ok((stage, before.unchecked_into(), after.unchecked_into()))
}

impl Stage {
    fn presenter(&self) -> LabelPresenter {
        LabelPresenter::new(
            self.container.clone(),
            self.left_label.clone(),
            self.right_label.clone(),
        )
    }

    fn show_selection(&self, selection: &Selection, labels: &LabelPresenter) {
        set_text(&self.title, selection.title());
        let legend = selection.legend();
        set_text(&self.legend_left, legend.left);
        set_text(&self.legend_right, legend.right);
        labels.set_labels(&selection.labels());
    }

    fn add_button(&self, doc: &Document, text: &str) -> Result<HtmlButtonElement, JsValue> {
        let button: HtmlButtonElement = doc.create_element("button")?.unchecked_into();
        button.set_text_content(Some(text));
        self.controls.append_child(&button)?;
        Ok(button)
    }
}

// ---------------------------------------------------------------------------
// Image page
// ---------------------------------------------------------------------------

struct ImagePage {
    selection: Selection,
    pair: ImagePair<ImageHandle>,
    queue: EventQueue,
    labels: LabelPresenter,
    stage: Stage,
    modes: Vec<(CompareMode, HtmlButtonElement)>,
}

impl ImagePage {
    fn pump(&mut self) {
        loop {
            let batch = self.queue.drain();
            if batch.is_empty() {
                break;
            }
            for event in batch {
                self.pair.handle(event);
            }
        }
        set_text(&self.stage.status, &self.pair.status().to_string());
    }

    fn select_asset(&mut self, index: &str) {
        let reload = self.selection.set_asset_index(index);
        self.pair.load(&reload.paths);
        self.pump();
    }

    fn select_mode(&mut self, mode: CompareMode) {
        match self.selection.set_mode(mode) {
            Ok(Some(reload)) => {
                self.pair.load(&reload.paths);
            }
            Ok(None) => {}
            Err(err) => warn(&err.to_string()),
        }
        self.show_selection();
        self.pump();
    }

    fn show_selection(&self) {
        self.stage.show_selection(&self.selection, &self.labels);
        for (mode, button) in &self.modes {
            let _ = button
                .class_list()
                .toggle_with_force("active", *mode == self.selection.mode());
            let weight = if *mode == self.selection.mode() { "700" } else { "400" };
            let _ = button.style().set_property("font-weight", weight);
        }
    }
}

fn image_page(doc: &Document, body: &HtmlElement, assets: &[String]) -> Result<(), JsValue> {
    let (stage, before, after): (Stage, HtmlImageElement, HtmlImageElement) =
        build_stage(doc, body, "img", assets)?;

    let mut modes = Vec::new();
    for mode in [CompareMode::Baseline, CompareMode::GroundTruth] {
        modes.push((mode, stage.add_button(doc, mode.display_name())?));
    }

    let queue = EventQueue::new();
    let page = Rc::new(RefCell::new(ImagePage {
        selection: Selection::new(MediaKind::Image),
        pair: ImagePair::new(
            ImageHandle::new(before, Side::Before, queue.clone()),
            ImageHandle::new(after, Side::After, queue.clone()),
        ),
        queue,
        labels: stage.presenter(),
        stage,
        modes,
    }));

    {
        let mut p = page.borrow_mut();
        p.show_selection();
        p.labels.reveal(SliderPosition::CENTER);
        if let Some(first) = assets.first() {
            p.stage.select.set_value(first);
            p.select_asset(first);
        }
    }

    let modes: Vec<_> = page.borrow().modes.clone();
    for (mode, button) in modes {
        let cb_page = Rc::clone(&page);
        listen(&button, "click", move |_| cb_page.borrow_mut().select_mode(mode))?;
    }

    let select = page.borrow().stage.select.clone();
    let cb_page = Rc::clone(&page);
    listen(&select, "change", move |_| {
        let mut p = cb_page.borrow_mut();
        let index = p.stage.select.value();
        p.select_asset(&index);
    })?;

    let slider = page.borrow().stage.slider.clone();
    let cb_page = Rc::clone(&page);
    listen(&slider, "input", move |_| {
        let mut p = cb_page.borrow_mut();
        if let Some(position) = SliderPosition::parse(&p.stage.slider.value()) {
            p.labels.reveal(position);
        }
    })?;

    let cb_page = Rc::clone(&page);
    on_resize(move || {
        cb_page.borrow().labels.refresh();
    })?;

    let cb_page = Rc::clone(&page);
    let raf = RafLoop::new(move |_| cb_page.borrow_mut().pump());
    raf.start();
    core::mem::forget(raf);

    Ok(())
}

// ---------------------------------------------------------------------------
// Video page
// ---------------------------------------------------------------------------

struct VideoUi {
    play: HtmlButtonElement,
    restart: HtmlButtonElement,
    mute: HtmlButtonElement,
}

struct VideoPage {
    selection: Selection,
    pair: PairController<VideoHandle>,
    queue: EventQueue,
    labels: LabelPresenter,
    stage: Stage,
    ui: VideoUi,
}

impl VideoPage {
    fn pump(&mut self, now: HostTime) {
        loop {
            let batch = self.queue.drain();
            if batch.is_empty() {
                break;
            }
            for event in batch {
                self.pair.handle(event, now);
            }
        }
        self.pair.tick(now);
        self.render();
    }

    fn render(&self) {
        set_text(&self.stage.status, &self.pair.status().to_string());
        set_text(
            &self.ui.play,
            if self.pair.is_active() { "Pause" } else { "Play" },
        );
        set_text(
            &self.ui.mute,
            if self.pair.is_muted() { "Unmute" } else { "Mute" },
        );
    }

    fn command(&mut self, result: Result<(), ControlError>) {
        if let Err(err) = result {
            warn(&err.to_string());
        }
        self.pump(juxta_backend_web::now());
    }

    fn select_asset(&mut self, index: &str) {
        let reload = self.selection.set_asset_index(index);
        self.pair.load(&reload.paths, juxta_backend_web::now());
        self.pump(juxta_backend_web::now());
    }
}

fn video_page(doc: &Document, body: &HtmlElement, assets: &[String]) -> Result<(), JsValue> {
    let (stage, before, after): (Stage, HtmlVideoElement, HtmlVideoElement) =
        build_stage(doc, body, "video", assets)?;
    let ui = VideoUi {
        play: stage.add_button(doc, "Play")?,
        restart: stage.add_button(doc, "Restart")?,
        mute: stage.add_button(doc, "Unmute")?,
    };

    let policy = SyncPolicy::CANONICAL;
    let time_updates = policy.correction_target == CorrectionTarget::Triggering;
    let queue = EventQueue::new();
    let pair = PairController::with_sink(
        policy,
        VideoHandle::new(before, Side::Before, queue.clone()).with_time_updates(time_updates),
        VideoHandle::new(after, Side::After, queue.clone()).with_time_updates(time_updates),
        Box::new(ConsoleSink),
    );
    let selection = Selection::new(MediaKind::Video);
    let labels = stage.presenter();
    stage.show_selection(&selection, &labels);

    let page = Rc::new(RefCell::new(VideoPage {
        selection,
        pair,
        queue,
        labels,
        stage,
        ui,
    }));

    {
        let mut p = page.borrow_mut();
        p.labels.reveal(SliderPosition::CENTER);
        if let Some(first) = assets.first() {
            p.stage.select.set_value(first);
            p.select_asset(first);
        }
    }

    let (play, restart, mute, select, slider) = {
        let p = page.borrow();
        (
            p.ui.play.clone(),
            p.ui.restart.clone(),
            p.ui.mute.clone(),
            p.stage.select.clone(),
            p.stage.slider.clone(),
        )
    };

    let cb_page = Rc::clone(&page);
    listen(&play, "click", move |_| {
        let mut p = cb_page.borrow_mut();
        let result = p.pair.toggle_play(juxta_backend_web::now());
        p.command(result);
    })?;

    let cb_page = Rc::clone(&page);
    listen(&restart, "click", move |_| {
        let mut p = cb_page.borrow_mut();
        let result = p.pair.restart(juxta_backend_web::now());
        p.command(result);
    })?;

    let cb_page = Rc::clone(&page);
    listen(&mute, "click", move |_| {
        let mut p = cb_page.borrow_mut();
        p.pair.toggle_mute();
        p.render();
    })?;

    let cb_page = Rc::clone(&page);
    listen(&select, "change", move |_| {
        let mut p = cb_page.borrow_mut();
        let index = p.stage.select.value();
        p.select_asset(&index);
    })?;

    let cb_page = Rc::clone(&page);
    listen(&slider, "input", move |_| {
        let mut p = cb_page.borrow_mut();
        if let Some(position) = SliderPosition::parse(&p.stage.slider.value()) {
            p.labels.reveal(position);
        }
    })?;

    let cb_page = Rc::clone(&page);
    on_resize(move || {
        cb_page.borrow().labels.refresh();
    })?;

    let cb_page = Rc::clone(&page);
    let raf = RafLoop::new(move |now| cb_page.borrow_mut().pump(now));
    raf.start();
    core::mem::forget(raf);

    Ok(())
}

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

fn element(doc: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(doc.create_element(tag)?.unchecked_into())
}

fn media(doc: &Document, tag: &str, css: &str) -> Result<HtmlElement, JsValue> {
    let el = element(doc, tag)?;
    style(&el, css)?;
    Ok(el)
}

fn style(el: &web_sys::Element, css: &str) -> Result<(), JsValue> {
    el.set_attribute("style", css)
}

fn warn(text: &str) {
    console::warn_1(&JsValue::from_str(text));
}

/// Attaches a listener for the lifetime of the page.
fn listen(
    target: &EventTarget,
    kind: &str,
    callback: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_resize(mut callback: impl FnMut() + 'static) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    listen(&window, "resize", move |_| callback())
}
