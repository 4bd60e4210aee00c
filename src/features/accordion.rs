//! FAQ accordion: one open answer at a time.

use std::rc::Rc;

use log::{debug, info};

use crate::config::AccordionConfig;
use crate::dom::{Document, DomEvent, Element};
use crate::lifecycle::Disposer;

#[derive(Clone)]
struct Item<E> {
    root: E,
    answer: E,
}

pub fn init<D: Document>(doc: &D, config: &AccordionConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("accordion");

    let mut questions = Vec::new();
    let mut items = Vec::new();
    for root in doc.query_all(&config.item_selector) {
        let question = root.query(&config.question_selector);
        let answer = root.query(&config.answer_selector);
        match (question, answer) {
            (Some(question), Some(answer)) => {
                questions.push(question);
                items.push(Item { root, answer });
            }
            _ => debug!("FAQ item without question or answer skipped"),
        }
    }
    let items = Rc::new(items);

    for (index, question) in questions.iter().enumerate() {
        let items = items.clone();
        let class = config.open_class.clone();
        disposer.push(question.listen(
            "click",
            Box::new(move |_: &DomEvent<D::Element>| toggle(&items, index, &class)),
        ));
    }

    info!("Accordion wired with {} items", items.len());
    disposer
}

fn toggle<E: Element>(items: &[Item<E>], clicked: usize, class: &str) {
    let item = &items[clicked];
    let was_open = item.root.has_class(class);

    for (index, other) in items.iter().enumerate() {
        if index != clicked {
            other.root.remove_class(class);
            other.answer.set_style("max-height", "0");
        }
    }

    if was_open {
        item.root.remove_class(class);
        item.answer.set_style("max-height", "0");
    } else {
        item.root.add_class(class);
        item.answer
            .set_style("max-height", &format!("{}px", item.answer.scroll_height()));
    }
}
