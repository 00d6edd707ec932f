//! The process-wide live-node counter.
//!
//! Kept in its own test binary so concurrent tests in other binaries
//! cannot perturb the count.

mod common;

use common::Mirror;
use crossbar::element::{live_nodes, Node};

#[test]
fn test_live_node_counter_tracks_construction_and_drop() {
    let before = live_nodes();
    {
        let _a = Node::new(Box::new(Mirror));
        let _b = Node::with_nports(Box::new(Mirror), 1, 1);
        assert_eq!(live_nodes(), before + 2);
    }
    assert_eq!(live_nodes(), before);
}
