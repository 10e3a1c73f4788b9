crate::define_id_enum! {
    /// Application archetype identifier
    ///
    /// `Generic` is the classifier's no-match sentinel and is never registered
    /// in the catalog.
    ArchetypeId {
        NodeJs => "node_js" : "Node.js service",
        PythonFlask => "python_flask" : "Flask service",
        PythonDjango => "python_django" : "Django service",
        JavaSpring => "java_spring" : "Spring service",
        Go => "go" : "Go service",
        React => "react" : "React static site",
        MachineLearning => "machine_learning" : "Machine learning workload",
        Generic => "generic" : "Generic application",
    }
}

impl ArchetypeId {
    pub fn is_generic(&self) -> bool {
        matches!(self, ArchetypeId::Generic)
    }
}
