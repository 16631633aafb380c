use crate::types::HistoryQueryWindow;

impl HistoryQueryWindow {
    /// Confirmed transactions between the anchor and the caller's last known block.
    pub fn confirmed(height: u64, last_known_block: u64) -> Self {
        Self {
            start: height,
            end: Some(last_known_block),
            from: 0,
            to: 0,
            pending_only: false,
        }
    }

    /// Mempool query that only asks for `totalCount`.
    pub fn pending_count(height: u64) -> Self {
        Self {
            start: height,
            end: None,
            from: 0,
            to: 0,
            pending_only: true,
        }
    }

    /// Mempool query for the first `total` items.
    pub fn pending_items(height: u64, total: u64) -> Self {
        Self {
            to: total,
            ..Self::pending_count(height)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_shapes() {
        assert_eq!(
            serde_json::to_value(HistoryQueryWindow::confirmed(120, 100)).unwrap(),
            json!({ "start": 120, "end": 100, "from": 0, "to": 0, "queryMempoolOnly": false })
        );
        assert_eq!(
            serde_json::to_value(HistoryQueryWindow::pending_count(120)).unwrap(),
            json!({ "start": 120, "from": 0, "to": 0, "queryMempoolOnly": true })
        );
        assert_eq!(
            serde_json::to_value(HistoryQueryWindow::pending_items(120, 4)).unwrap(),
            json!({ "start": 120, "from": 0, "to": 4, "queryMempoolOnly": true })
        );
    }
}
