use crate::controls::{
    button_for_treatment, format_intensity, parse_intensity, ACTIVE_CLASS, INTENSITY_INPUT,
    TREATMENT_BUTTONS,
};
use crate::simulator::Session;
use facesim_core::{ControlEvent, TreatmentKind};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
fn add_listener(element: &web::Element, event: &str, handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    let _ = element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn intensity_input(document: &web::Document) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(INTENSITY_INPUT)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
}

/// Marks the button for `kind` active and mirrors `intensity` into the slider.
pub fn reflect_selection(document: &web::Document, kind: TreatmentKind, intensity: f32) {
    let active = button_for_treatment(kind);
    for (id, _) in TREATMENT_BUTTONS {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force(ACTIVE_CLASS, id == active);
        }
    }
    if let Some(input) = intensity_input(document) {
        input.set_value(&format_intensity(intensity));
    }
}

/// Wires the treatment buttons and intensity slider to `session`. Missing
/// elements are skipped so pages may expose a subset of the controls.
pub fn bind_controls(session: &Rc<RefCell<Session>>) -> anyhow::Result<()> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let mut bound = 0;

    for (id, kind) in TREATMENT_BUTTONS {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("[controls] missing #{id}");
            continue;
        };
        let session = Rc::clone(session);
        let doc = document.clone();
        add_listener(&el, "click", move || {
            let Ok(mut s) = session.try_borrow_mut() else {
                log::warn!("[controls] simulator busy; dropping click on {kind}");
                return;
            };
            s.handle(ControlEvent::SelectTreatment(kind));
            let selection = s.selection();
            reflect_selection(&doc, selection.kind(), selection.intensity);
        });
        bound += 1;
    }

    if let Some(input) = intensity_input(&document) {
        let session = Rc::clone(session);
        let reader = input.clone();
        add_listener(&input, "input", move || {
            let Some(intensity) = parse_intensity(&reader.value()) else {
                return;
            };
            if let Ok(mut s) = session.try_borrow_mut() {
                s.handle(ControlEvent::SetIntensity(intensity));
            }
        });
        bound += 1;
    } else {
        log::warn!("[controls] missing #{INTENSITY_INPUT}");
    }

    if bound == 0 {
        anyhow::bail!("no treatment controls found in the document");
    }
    let selection = session.borrow().selection();
    reflect_selection(&document, selection.kind(), selection.intensity);
    log::info!("[controls] bound {bound} controls");
    Ok(())
}
