use super::Repository;

impl Repository {
    /// Rebuild the working set from storage, e.g. after a restart. Also
    /// re-seeds the per-year reference sequences so new tenders continue
    /// the numbering.
    pub async fn load_state(&self) -> anyhow::Result<()> {
        let tender_rows = self.db.get_tenders().await?;
        let bid_rows = self.db.get_bids().await?;

        let mut tenders = self.in_memory_store.tenders.write().await;
        let mut sequences = self.in_memory_store.reference_sequences.lock().await;
        for row in tender_rows {
            let tender = row.get_tender_entity()?;
            if let Some((year, sequence)) = tender.reference.parts() {
                let seen = sequences.entry(year).or_insert(0);
                *seen = (*seen).max(sequence);
            }
            tenders.insert(tender.id, tender);
        }
        drop(sequences);
        drop(tenders);

        let mut bids = self.in_memory_store.bids.write().await;
        for row in bid_rows {
            let bid = row.get_bid_entity()?;
            bids.entry(bid.tender_id).or_insert_with(Vec::new).push(bid);
        }
        Ok(())
    }
}
