use crate::constants::{POPUP_HEADER_ID, POPUP_ID, POPUP_OFFSET_PX, POPUP_VALUE_ID};
use crate::dom;
use globe_core::{TooltipFrame, TooltipSurface};
use web_sys as web;

/// The `#popup` element with its country/population slots.
pub struct DomTooltip {
    popup: Option<web::HtmlElement>,
    header: Option<web::HtmlElement>,
    value: Option<web::HtmlElement>,
    canvas: web::HtmlCanvasElement,
    last_label: Option<String>,
    shown: bool,
}

impl DomTooltip {
    pub fn from_document(document: &web::Document, canvas: &web::HtmlCanvasElement) -> Self {
        let popup = dom::element_by_id(document, POPUP_ID);
        if popup.is_none() {
            log::warn!("[tooltip] missing #{}; hover details will not be shown", POPUP_ID);
        }
        let tooltip = Self {
            popup,
            header: dom::element_by_id(document, POPUP_HEADER_ID),
            value: dom::element_by_id(document, POPUP_VALUE_ID),
            canvas: canvas.clone(),
            last_label: None,
            shown: true,
        };
        tooltip.hide();
        tooltip
    }

    #[inline]
    fn hide(&self) {
        if let Some(el) = &self.popup {
            _ = el.set_attribute("style", "display:none");
        }
    }

    fn show_at(&self, x: f32, y: f32) {
        if let Some(el) = &self.popup {
            let rect = self.canvas.get_bounding_client_rect();
            let left = rect.left() as f32 + x + POPUP_OFFSET_PX[0];
            let top = rect.top() as f32 + y + POPUP_OFFSET_PX[1];
            let style = format!(
                "display:block;position:fixed;left:0;top:0;transform:translate({:.1}px,{:.1}px)",
                left, top
            );
            _ = el.set_attribute("style", &style);
        }
    }
}

impl TooltipSurface for DomTooltip {
    fn present(&mut self, frame: &TooltipFrame) {
        if !frame.visible {
            if self.shown {
                self.hide();
                self.shown = false;
                self.last_label = None;
            }
            return;
        }
        if let Some(pos) = frame.screen_position {
            self.show_at(pos.x, pos.y);
        }
        self.shown = true;
        // Only rewrite text when the hovered marker changes.
        if frame.label != self.last_label {
            if let (Some(el), Some(label)) = (&self.header, &frame.label) {
                el.set_inner_text(label);
            }
            if let (Some(el), Some(metric)) = (&self.value, &frame.metric) {
                el.set_inner_text(metric);
            }
            self.last_label = frame.label.clone();
        }
    }
}
