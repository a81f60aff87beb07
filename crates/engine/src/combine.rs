use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};

/// N-way combine-latest join. The output emits on every upstream emission
/// once each source has produced at least one value; every output row holds
/// the most recent value per source slot, in source order. Rows are produced
/// strictly in arrival order of the triggering emissions.
pub fn combine_latest<T>(sources: Vec<BoxStream<'static, T>>) -> BoxStream<'static, Vec<T>>
where
    T: Clone + Send + 'static,
{
    let count = sources.len();
    let indexed: Vec<_> = sources
        .into_iter()
        .enumerate()
        .map(|(slot, source)| source.map(move |value| (slot, value)).boxed())
        .collect();

    stream::select_all(indexed)
        .scan(vec![None; count], |latest: &mut Vec<Option<T>>, (slot, value)| {
            latest[slot] = Some(value);
            future::ready(Some(latest.clone()))
        })
        .filter_map(|latest| future::ready(latest.into_iter().collect::<Option<Vec<T>>>()))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::combine_latest;
    use futures_util::future::FutureExt;
    use futures_util::stream::StreamExt;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    fn source() -> (
        mpsc::UnboundedSender<i32>,
        futures_util::stream::BoxStream<'static, i32>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, UnboundedReceiverStream::new(rx).boxed())
    }

    #[test]
    fn silent_until_every_source_has_emitted() {
        let (tx_a, rx_a) = source();
        let (tx_b, rx_b) = source();
        let (_tx_c, rx_c) = source();
        let mut combined = combine_latest(vec![rx_a, rx_b, rx_c]);

        tx_a.send(1).unwrap();
        tx_b.send(2).unwrap();
        assert!(combined.next().now_or_never().is_none());
    }

    #[test]
    fn emits_latest_value_per_slot() {
        let (tx_a, rx_a) = source();
        let (tx_b, rx_b) = source();
        let mut combined = combine_latest(vec![rx_a, rx_b]);

        tx_a.send(1).unwrap();
        tx_a.send(5).unwrap();
        tx_b.send(10).unwrap();

        let mut row = None;
        while let Some(Some(next)) = combined.next().now_or_never() {
            row = Some(next);
        }
        assert_eq!(row, Some(vec![5, 10]));
    }

    #[test]
    fn re_emits_on_every_later_emission() {
        let (tx_a, rx_a) = source();
        let (tx_b, rx_b) = source();
        let mut combined = combine_latest(vec![rx_a, rx_b]);

        tx_a.send(1).unwrap();
        tx_b.send(2).unwrap();
        assert_eq!(combined.next().now_or_never().flatten(), Some(vec![1, 2]));

        tx_b.send(3).unwrap();
        assert_eq!(combined.next().now_or_never().flatten(), Some(vec![1, 3]));

        tx_a.send(4).unwrap();
        assert_eq!(combined.next().now_or_never().flatten(), Some(vec![4, 3]));
    }

    #[test]
    fn ends_when_all_sources_end() {
        let (tx_a, rx_a) = source();
        let (tx_b, rx_b) = source();
        let mut combined = combine_latest(vec![rx_a, rx_b]);

        tx_a.send(1).unwrap();
        tx_b.send(2).unwrap();
        drop(tx_a);
        drop(tx_b);

        assert_eq!(combined.next().now_or_never().flatten(), Some(vec![1, 2]));
        assert_eq!(combined.next().now_or_never(), Some(None));
    }
}
