use std::collections::HashMap;

use super::StackTrace;

/// Threads that share one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackGroup {
    /// The first trace seen for this group.
    pub stack: StackTrace,
    /// Thread numbers, ascending.
    pub threads: Vec<u32>,
}

/// Group equivalent traces, largest group first.
///
/// Groups of equal size keep the order in which their first thread appeared.
pub fn group_unique(traces: Vec<StackTrace>) -> Vec<StackGroup> {
    let mut index: HashMap<StackTrace, usize> = HashMap::new();
    let mut groups: Vec<StackGroup> = Vec::new();

    for trace in traces {
        if let Some(&slot) = index.get(&trace) {
            groups[slot].threads.push(trace.thread);
            continue;
        }
        index.insert(trace.clone(), groups.len());
        groups.push(StackGroup {
            threads: vec![trace.thread],
            stack: trace,
        });
    }

    for group in &mut groups {
        group.threads.sort_unstable();
    }
    groups.sort_by(|a, b| b.threads.len().cmp(&a.threads.len()));
    groups
}

pub fn render_report(groups: &[StackGroup], thread_count: usize) -> String {
    let mut out = format!(
        "\n== Printing {} unique stacks from {} threads\n\n",
        groups.len(),
        thread_count
    );
    for group in groups {
        out.push_str(&format!("Stack for thread ids {:?}\n{}\n\n", group.threads, group.stack));
    }
    out
}
