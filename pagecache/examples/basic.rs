// Example: paging through a list whose records arrive asynchronously.
use std::collections::VecDeque;

use pagecache::{
    FetchRequest, ListEngineOptions, PagedListEngine, RebuildType, RecordProvider, Response,
};

/// A provider that answers on the next "event loop turn".
struct Backend {
    rows: Vec<String>,
    inbox: VecDeque<FetchRequest>,
}

impl RecordProvider<String> for Backend {
    fn records_count(&self) -> usize {
        self.rows.len()
    }

    fn request_records(&mut self, request: FetchRequest) {
        self.inbox.push_back(request);
    }
}

impl Backend {
    fn poll(&mut self) -> Option<Response<String>> {
        let req = self.inbox.pop_front()?;
        let end = req.end().min(self.rows.len());
        let start = req.offset.min(end);
        Some(Response::new(
            req.ticket,
            self.rows[start..end].to_vec(),
            self.rows.len(),
        ))
    }
}

fn run(engine: &mut PagedListEngine<String, Backend>) {
    while let Some(response) = engine.provider_mut().poll() {
        engine.on_response(response);
    }
}

fn main() {
    let backend = Backend {
        rows: (0..23).map(|i| format!("row {i}")).collect(),
        inbox: VecDeque::new(),
    };
    // A 120px viewport with 24px rows shows five rows per page.
    let mut engine = PagedListEngine::new(ListEngineOptions::new(120, 24), backend);

    engine.rebuild_list(RebuildType::Full, 0, false);
    run(&mut engine);
    loop {
        let rows: Vec<_> = engine.page().cloned().collect();
        println!("start={} rows={rows:?}", engine.start_index());
        if !engine.request_next_page() {
            break;
        }
        run(&mut engine);
    }
}
