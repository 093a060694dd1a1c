use async_channel::{Receiver, Sender};

/// In-process MPMC job queue. The upload handler's responsibility ends at
/// `send`; a worker pool owns the receiving side. Bounded so a burst of
/// uploads applies backpressure instead of accumulating raw files.
pub struct JobQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> JobQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(capacity);
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<T> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<T> {
        self.rx.clone()
    }
}

impl<T> Clone for JobQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn jobs_flow_from_sender_to_any_receiver() {
        let queue: JobQueue<u32> = JobQueue::new(4);
        queue.sender().send(7).await.unwrap();

        let other_handle = queue.clone();
        assert_eq!(other_handle.receiver().recv().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn each_job_is_delivered_to_exactly_one_consumer() {
        let queue: JobQueue<u32> = JobQueue::new(4);
        let rx_a = queue.receiver();
        let rx_b = queue.receiver();

        queue.sender().send(1).await.unwrap();
        queue.sender().send(2).await.unwrap();

        let a = rx_a.recv().await.unwrap();
        let b = rx_b.recv().await.unwrap();
        assert_ne!(a, b);
    }
}
