// Example: a list that stays on its page while records are deleted underneath it.
use pagecache::{ListEngineOptions, RebuildType};
use pagecache_adapter::{ListController, MemoryStore};

fn main() {
    let store: MemoryStore<u32> = (0..12).collect();
    let mut list = ListController::new(ListEngineOptions::new(40, 10), store);

    list.rebuild(RebuildType::OnPageElement, 9);
    println!("page={:?} focused={:?}", list.page(), list.focused());

    // Delete the whole last page; the controller falls back to the page before it.
    while list.store().len() > 8 {
        list.remove(8);
    }
    println!("page={:?} focused={:?}", list.page(), list.focused());
}
