use crate::title::ArticleTitle;
use std::collections::VecDeque;

/// FIFO queue of titles that have been discovered but not yet expanded.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<ArticleTitle>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: ArticleTitle) {
        self.queue.push_back(title);
    }

    pub fn pop(&mut self) -> Option<ArticleTitle> {
        self.queue.pop_front()
    }

    /// Remove and return everything currently queued, in FIFO order.
    ///
    /// Called between layers, so the returned titles all sit at the same BFS
    /// distance and anything pushed afterwards belongs to the next layer.
    pub fn take_layer(&mut self) -> Vec<ArticleTitle> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
