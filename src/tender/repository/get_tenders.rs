use {
    super::Repository,
    crate::tender::entities,
};

impl Repository {
    /// Filtered listing over the working set, sorted by closing time
    /// (closing soonest first).
    pub async fn get_tenders(&self, filter: &entities::TenderFilter) -> Vec<entities::Tender> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let tenders = self.in_memory_store.tenders.read().await;
        let mut result: Vec<entities::Tender> = tenders
            .values()
            .filter(|tender| {
                filter.status.map_or(true, |s| tender.status == s)
                    && filter.category.map_or(true, |c| tender.category == c)
                    && filter.created_by.map_or(true, |u| tender.created_by == u)
                    && search.as_ref().map_or(true, |q| {
                        tender.title.to_lowercase().contains(q)
                            || tender.description.to_lowercase().contains(q)
                            || tender.reference.as_str().to_lowercase().contains(q)
                    })
            })
            .cloned()
            .collect();
        result.sort_by_key(|tender| tender.closing_time);
        result
    }
}
